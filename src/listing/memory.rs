//! In-memory lister
//!
//! Serves canned listings for a single repository, records every fetch and
//! can hold a path's fetch open until released. Used by tests.
//!
//! @module listing/memory

use super::{DirectoryEntry, DirectoryLister};
use crate::core::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

/// Lister answering from a fixed table of listings
pub struct MemoryLister {
    repository: String,
    listings: Mutex<HashMap<String, std::result::Result<Vec<DirectoryEntry>, String>>>,
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl MemoryLister {
    pub fn new(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            listings: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Register the listing for `path` (`""` is the root)
    pub fn with_dir(self, path: &str, entries: Vec<DirectoryEntry>) -> Self {
        self.set_dir(path, entries);
        self
    }

    /// Make fetches of `path` fail with `message`
    pub fn with_failure(self, path: &str, message: &str) -> Self {
        self.set_failure(path, message);
        self
    }

    pub fn set_dir(&self, path: &str, entries: Vec<DirectoryEntry>) {
        self.listings.lock().insert(path.to_string(), Ok(entries));
    }

    pub fn set_failure(&self, path: &str, message: &str) {
        self.listings
            .lock()
            .insert(path.to_string(), Err(message.to_string()));
    }

    /// Hold fetches of `path` until the returned handle is notified
    pub fn hold(&self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().insert(path.to_string(), gate.clone());
        gate
    }

    /// Every fetched path, in request order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_for(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl DirectoryLister for MemoryLister {
    async fn list_directory(&self, repository: &str, path: &str) -> Result<Vec<DirectoryEntry>> {
        self.calls.lock().push(path.to_string());

        let gate = self.gates.lock().get(path).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if repository != self.repository {
            return Err(Error::listing(path, "Failed to fetch repository tree: 404"));
        }

        match self.listings.lock().get(path) {
            Some(Ok(entries)) => Ok(entries.clone()),
            Some(Err(message)) => Err(Error::listing(path, message.clone())),
            None => Err(Error::listing(path, "Failed to fetch repository tree: 404")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let lister = MemoryLister::new("octo/repo")
            .with_dir("", vec![DirectoryEntry::dir("src", "")])
            .with_failure("src", "rate limited");

        assert_eq!(lister.list_directory("octo/repo", "").await.unwrap().len(), 1);
        let err = lister.list_directory("octo/repo", "src").await.unwrap_err();
        assert_eq!(err.to_string(), "rate limited");
        assert!(lister.list_directory("other/repo", "").await.is_err());

        assert_eq!(lister.calls(), vec!["", "src", ""]);
        assert_eq!(lister.calls_for(""), 2);
    }
}
