use crate::core::config::CacheConfig;
use crate::core::error::Result;
use crate::listing::{DirectoryEntry, DirectoryLister};
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

type Key = (String, String);

struct Cached {
    fetched_at: Instant,
    entries: Arc<Vec<DirectoryEntry>>,
}

/// LRU cache of successful listings keyed by (repository, path)
///
/// Entries older than the TTL are treated as missing and dropped on access.
pub struct ListingCache {
    cache: Mutex<LruCache<Key, Cached>>,
    ttl: Duration,
}

impl ListingCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, repository: &str, path: &str) -> Option<Arc<Vec<DirectoryEntry>>> {
        let key = (repository.to_string(), path.to_string());
        let mut cache = self.cache.lock();

        let expired = match cache.get(&key) {
            Some(cached) if cached.fetched_at.elapsed() < self.ttl => {
                return Some(Arc::clone(&cached.entries));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            cache.pop(&key);
        }
        None
    }

    pub fn put(&self, repository: &str, path: &str, entries: Vec<DirectoryEntry>) {
        self.cache.lock().put(
            (repository.to_string(), path.to_string()),
            Cached {
                fetched_at: Instant::now(),
                entries: Arc::new(entries),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

/// Lister decorator that answers repeated requests from a [`ListingCache`]
///
/// Failures are never cached, so a retry always reaches the inner lister.
pub struct CachedLister {
    inner: Arc<dyn DirectoryLister>,
    cache: ListingCache,
}

impl CachedLister {
    pub fn new(inner: Arc<dyn DirectoryLister>, config: &CacheConfig) -> Self {
        Self {
            inner,
            cache: ListingCache::new(config.max_entries, Duration::from_secs(config.ttl_secs)),
        }
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }
}

#[async_trait]
impl DirectoryLister for CachedLister {
    async fn list_directory(&self, repository: &str, path: &str) -> Result<Vec<DirectoryEntry>> {
        if let Some(entries) = self.cache.get(repository, path) {
            debug!(repository, path, "listing cache hit");
            return Ok(entries.as_ref().clone());
        }

        let entries = self.inner.list_directory(repository, path).await?;
        self.cache.put(repository, path, entries.clone());
        Ok(entries)
    }
}
