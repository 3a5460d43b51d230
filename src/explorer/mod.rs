//! Lazy repository file tree
//!
//! The tree starts with the root listing. Directories are fetched the first
//! time they are expanded and keep their children when collapsed. Loading
//! with a highlighted path eagerly expands the chain of directories leading
//! to it, root first.
//!
//! @module explorer

pub mod command;
#[allow(clippy::module_inception)]
pub mod explorer;
pub mod node;
pub mod tree;

pub use command::{Command, Effect};
pub use explorer::{DirRef, HighlightStatus, TreeExplorer};
pub use node::{NodeState, TreeNode};
pub use tree::Tree;
