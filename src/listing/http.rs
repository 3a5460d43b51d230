//! Listing API client
//!
//! Talks to a server exposing `POST /api/repository-tree`, either
//! `gitgutter serve` or any compatible code-search backend.
//!
//! @module listing/http

use super::{DirectoryEntry, DirectoryLister, ListingRequest, ListingResponse};
use crate::core::config::ApiConfig;
use crate::core::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const LISTING_ENDPOINT: &str = "/api/repository-tree";

/// HTTP client for the remote listing API
pub struct HttpLister {
    client: Client,
    base_url: String,
}

impl HttpLister {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_config(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn with_config(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, LISTING_ENDPOINT)
    }
}

#[async_trait]
impl DirectoryLister for HttpLister {
    async fn list_directory(&self, repository: &str, path: &str) -> Result<Vec<DirectoryEntry>> {
        let request = ListingRequest {
            repository: repository.to_string(),
            path: path.to_string(),
        };

        debug!(repository, path, "requesting listing");

        let res = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::listing(path, format!("Listing API unreachable: {}", e)))?;

        let status = res.status();
        let body: ListingResponse = res.json().await.map_err(|e| {
            Error::listing(path, format!("Invalid listing response ({}): {}", status, e))
        })?;

        if !status.is_success() || !body.success {
            let message = body
                .error
                .unwrap_or_else(|| format!("Listing API returned {}", status));
            return Err(Error::listing(path, message));
        }

        Ok(body.tree.unwrap_or_default())
    }
}
