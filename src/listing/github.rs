//! GitHub contents API backend
//!
//! Lists a repository directory with `GET /repos/{owner}/{repo}/contents/{path}`
//! and converts it to listing entries, directories first.
//!
//! @module listing/github

use super::{sort_entries, DirectoryEntry, DirectoryLister, EntryKind};
use crate::core::config::GitHubConfig;
use crate::core::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

// =============================================================================
// RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

/// A directory yields an array; a file path yields a single object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsBody {
    Listing(Vec<ContentItem>),
    Single(serde::de::IgnoredAny),
}

impl From<ContentItem> for DirectoryEntry {
    fn from(item: ContentItem) -> Self {
        // symlinks and submodules cannot be listed further, so they are leaves
        let kind = if item.item_type == "dir" {
            EntryKind::Dir
        } else {
            EntryKind::File
        };

        DirectoryEntry {
            name: item.name,
            path: item.path,
            kind,
            html_url: item.html_url.unwrap_or_default(),
            size: item.size.unwrap_or(0),
            download_url: item.download_url,
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Directory lister backed by the GitHub REST API
pub struct GitHubLister {
    client: Client,
    api_url: Url,
    user_agent: String,
}

impl GitHubLister {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url).map_err(|e| Error::ConfigError {
            message: format!("Invalid GitHub API URL '{}': {}", config.api_url, e),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Build the contents URL, percent-encoding every segment
    fn contents_url(&self, repository: &str, path: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| Error::ConfigError {
                message: format!("GitHub API URL cannot be a base: {}", self.api_url),
            })?;
            segments.pop_if_empty().push("repos");
            segments.extend(repository.split('/').filter(|s| !s.is_empty()));
            segments.push("contents");
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }
}

#[async_trait]
impl DirectoryLister for GitHubLister {
    async fn list_directory(&self, repository: &str, path: &str) -> Result<Vec<DirectoryEntry>> {
        let url = self.contents_url(repository, path)?;
        debug!(%url, "fetching repository contents");

        let res = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, ACCEPT_JSON)
            .send()
            .await
            .map_err(|e| Error::listing(path, format!("GitHub unreachable: {}", e)))?;

        let status = res.status();
        if status != StatusCode::OK {
            if let Some(remaining) = res.headers().get("x-ratelimit-remaining") {
                if remaining.as_bytes() == b"0" {
                    warn!("GitHub rate limit exhausted");
                }
            }
            return Err(Error::listing(
                path,
                format!("Failed to fetch repository tree: {}", status.as_u16()),
            ));
        }

        let body: ContentsBody = res.json().await.map_err(|e| {
            Error::listing(path, format!("Invalid GitHub contents response: {}", e))
        })?;

        match body {
            ContentsBody::Listing(items) => {
                let mut entries: Vec<DirectoryEntry> = items.into_iter().map(Into::into).collect();
                sort_entries(&mut entries);
                Ok(entries)
            }
            ContentsBody::Single(_) => Err(Error::listing(path, "not a directory")),
        }
    }
}
