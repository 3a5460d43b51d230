use super::node::TreeNode;
use crate::listing::{join_path, DirectoryEntry};
use std::collections::HashSet;
use tracing::warn;

/// Partially loaded repository tree
///
/// Holds the root listing; deeper levels appear as directories are
/// expanded. Nodes are addressed by their repository-relative path.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    roots: Vec<TreeNode>,
}

impl Tree {
    /// Build a tree from the root listing
    pub fn from_listing(entries: Vec<DirectoryEntry>) -> Self {
        Self {
            roots: build_children("", entries),
        }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Find a node by path
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let mut segments = path.split('/');
        let first = segments.next()?;
        let mut node = self.roots.iter().find(|n| n.name() == first)?;
        for segment in segments {
            node = node.children.iter().find(|n| n.name() == segment)?;
        }
        Some(node)
    }

    pub(crate) fn find_mut(&mut self, path: &str) -> Option<&mut TreeNode> {
        let mut segments = path.split('/');
        let first = segments.next()?;
        let mut node = self.roots.iter_mut().find(|n| n.entry.name == first)?;
        for segment in segments {
            node = node.children.iter_mut().find(|n| n.entry.name == segment)?;
        }
        Some(node)
    }

    /// Children of a directory, or the roots for `""`
    ///
    /// Returns `None` if the directory is not in the tree.
    pub fn children_of(&self, parent: &str) -> Option<&[TreeNode]> {
        if parent.is_empty() {
            Some(&self.roots)
        } else {
            self.find(parent).map(|n| n.children())
        }
    }

    /// Number of nodes currently materialized
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[TreeNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }
}

/// Turn one listing into child nodes of `parent`
///
/// Keeps `path == parent + "/" + name` and unique names within the listing.
pub(crate) fn build_children(parent: &str, entries: Vec<DirectoryEntry>) -> Vec<TreeNode> {
    let mut seen = HashSet::new();
    let mut children = Vec::with_capacity(entries.len());

    for mut entry in entries {
        if entry.name.is_empty() || entry.name.contains('/') {
            warn!(parent, name = %entry.name, "skipping listing entry with invalid name");
            continue;
        }
        if !seen.insert(entry.name.clone()) {
            warn!(parent, name = %entry.name, "skipping duplicate listing entry");
            continue;
        }

        let expected = join_path(parent, &entry.name);
        if entry.path != expected {
            warn!(
                parent,
                got = %entry.path,
                expected = %expected,
                "listing entry path does not match its parent"
            );
            entry.path = expected;
        }

        children.push(TreeNode::new(entry));
    }

    children
}
