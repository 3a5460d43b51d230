use crate::listing::{DirectoryEntry, EntryKind};

/// Load/expansion state of a tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    /// File; cannot be expanded
    Leaf,
    /// Directory whose listing has not been fetched (or whose last fetch failed)
    Unloaded,
    /// Directory with a fetch in flight
    Loading { ticket: u64, expand_on_load: bool },
    /// Directory whose children hold one completed listing
    Loaded { expanded: bool },
}

/// A listing entry plus its lazily loaded children
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) entry: DirectoryEntry,
    pub(crate) children: Vec<TreeNode>,
    pub(crate) state: NodeState,
    pub(crate) error: Option<String>,
}

impl TreeNode {
    pub fn new(entry: DirectoryEntry) -> Self {
        let state = match entry.kind {
            EntryKind::Dir => NodeState::Unloaded,
            EntryKind::File => NodeState::Leaf,
        };

        Self {
            entry,
            children: Vec::new(),
            state,
            error: None,
        }
    }

    pub fn entry(&self) -> &DirectoryEntry {
        &self.entry
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn path(&self) -> &str {
        &self.entry.path
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Inline message left by the last failed expansion
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_dir(&self) -> bool {
        self.entry.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.entry.kind == EntryKind::File
    }

    pub fn is_expanded(&self) -> bool {
        self.state == NodeState::Loaded { expanded: true }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, NodeState::Loading { .. })
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, NodeState::Loaded { .. })
    }
}
