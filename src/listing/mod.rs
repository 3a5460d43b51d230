//! Directory listings
//!
//! A listing is one page of a repository's contents: the files and
//! subdirectories directly under a path. Listings come from a
//! [`DirectoryLister`], which is the only place network I/O happens.
//!
//! @module listing

pub mod github;
pub mod http;
pub mod memory;

use crate::cache::CachedLister;
use crate::core::config::{Config, SourceKind};
use crate::core::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

pub use github::GitHubLister;
pub use http::HttpLister;
pub use memory::MemoryLister;

// =============================================================================
// TYPES
// =============================================================================

/// Kind of a listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Dir => "dir",
        }
    }
}

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    /// Slash-separated, relative to the repository root
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl DirectoryEntry {
    /// Build an entry from its path; the name is the last segment
    pub fn new(kind: EntryKind, path: &str, html_url: &str) -> Self {
        Self {
            name: base_name(path).to_string(),
            path: path.to_string(),
            kind,
            html_url: html_url.to_string(),
            size: 0,
            download_url: None,
        }
    }

    pub fn file(path: &str, html_url: &str) -> Self {
        Self::new(EntryKind::File, path, html_url)
    }

    pub fn dir(path: &str, html_url: &str) -> Self {
        Self::new(EntryKind::Dir, path, html_url)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Body of `POST /api/repository-tree`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRequest {
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub path: String,
}

/// Response of `POST /api/repository-tree`
///
/// Success carries `tree` and echoes `path`; failure carries `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<Vec<DirectoryEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListingResponse {
    pub fn ok(path: &str, tree: Vec<DirectoryEntry>) -> Self {
        Self {
            success: true,
            tree: Some(tree),
            path: Some(path.to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

// =============================================================================
// LISTER
// =============================================================================

/// Source of directory listings
///
/// `path = ""` is the repository root. Implementations return
/// `Error::Listing` for any failure, including a non-success API answer.
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    async fn list_directory(&self, repository: &str, path: &str) -> Result<Vec<DirectoryEntry>>;
}

/// Build the lister for `source`, wrapped in the listing cache when enabled
pub fn build_lister(config: &Config, source: SourceKind) -> Result<Arc<dyn DirectoryLister>> {
    let lister: Arc<dyn DirectoryLister> = match source {
        SourceKind::Api => Arc::new(HttpLister::new(&config.api)),
        SourceKind::Github => Arc::new(GitHubLister::new(&config.github)?),
    };

    if config.cache.enabled {
        Ok(Arc::new(CachedLister::new(lister, &config.cache)))
    } else {
        Ok(lister)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Sort entries directories first, then by case-insensitive name
pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });
}

/// Join a parent path and a child name (root parent is `""`)
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Last segment of a slash-separated path
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Strip surrounding slashes so user input compares against listing paths
pub fn normalize_path(path: &str) -> &str {
    path.trim().trim_matches('/')
}
