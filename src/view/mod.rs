//! Tree view model
//!
//! `render` maps a [`Tree`] to plain, serializable [`NodeView`]s. The HTML
//! fragment and the terminal output are both produced from that view model,
//! never from the tree directly.
//!
//! @module view

pub mod ascii;
pub mod classify;
pub mod html;

use crate::explorer::{HighlightStatus, Tree, TreeNode};
use crate::listing::EntryKind;
use serde::Serialize;

pub use classify::FileTag;

// =============================================================================
// TYPES
// =============================================================================

/// Whole explorer view
#[derive(Debug, Clone, Serialize)]
pub struct TreeView {
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<String>,
    pub highlight: HighlightStatus,
    pub breadcrumb: Vec<Crumb>,
    pub nodes: Vec<NodeView>,
}

/// Directory arrow glyph state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrow {
    Open,
    Closed,
}

/// One rendered row and its visible children
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<Arrow>,
    pub expanded: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub highlighted: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<FileTag>,
    pub html_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}

/// Breadcrumb segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub path: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub current: bool,
}

// =============================================================================
// RENDERING
// =============================================================================

/// Map the tree to its view model
///
/// Arrow state comes only from `expanded`, emphasis only from
/// `path == highlighted`. Collapsed directories contribute no children.
pub fn render(tree: &Tree, highlighted: &str) -> Vec<NodeView> {
    render_level(tree.roots(), highlighted, 0)
}

fn render_level(nodes: &[TreeNode], highlighted: &str, depth: usize) -> Vec<NodeView> {
    nodes
        .iter()
        .map(|node| render_node(node, highlighted, depth))
        .collect()
}

fn render_node(node: &TreeNode, highlighted: &str, depth: usize) -> NodeView {
    let expanded = node.is_expanded();
    let arrow = node.is_dir().then_some(if expanded {
        Arrow::Open
    } else {
        Arrow::Closed
    });
    let tags = if node.is_file() {
        classify::tags(node.name())
    } else {
        Vec::new()
    };
    let children = if expanded {
        render_level(node.children(), highlighted, depth + 1)
    } else {
        Vec::new()
    };

    NodeView {
        name: node.name().to_string(),
        path: node.path().to_string(),
        kind: node.entry().kind,
        depth,
        arrow,
        expanded,
        highlighted: !highlighted.is_empty() && node.path() == highlighted,
        loading: node.is_loading(),
        error: node.error().map(str::to_string),
        tags,
        html_url: node.entry().html_url.clone(),
        children,
    }
}

/// Breadcrumb for a path: `root` followed by each segment
pub fn breadcrumb(path: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        label: "root".to_string(),
        path: String::new(),
        current: path.is_empty(),
    }];

    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let mut accumulated = String::new();
    for (i, part) in parts.iter().enumerate() {
        if !accumulated.is_empty() {
            accumulated.push('/');
        }
        accumulated.push_str(part);
        crumbs.push(Crumb {
            label: part.to_string(),
            path: accumulated.clone(),
            current: i == parts.len() - 1,
        });
    }

    crumbs
}
