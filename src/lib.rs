//! gitgutter - lazy file tree explorer for GitHub repositories
//!
//! Loads a repository one directory at a time, opens the folders leading to
//! a highlighted file, and renders the tree for the terminal or the browser.

pub mod cache;
pub mod cli;
pub mod core;
pub mod explorer;
pub mod listing;
pub mod view;
pub mod web;

pub use core::config::Config;
pub use core::error::{Error, Result};
pub use explorer::TreeExplorer;
