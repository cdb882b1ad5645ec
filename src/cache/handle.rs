//! Shared Cache Handle Module
//!
//! Async, clonable handle over the image store. Wraps the synchronous
//! [`ImageStore`] in an `Arc<RwLock<...>>` and coordinates overlapping
//! fetches so that concurrent `get_or_fetch` calls for the same key perform
//! a single upstream fetch.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{CacheStats, EntrySnapshot, ImageData, ImageStore};
use crate::config::Config;
use crate::error::Result;

// == Image Cache ==
/// Shared handle to the image cache.
///
/// Cloning is cheap; all clones see the same store. Consumers receive a
/// handle from application state rather than reaching for a global.
#[derive(Debug, Clone)]
pub struct ImageCache {
    /// The underlying store
    store: Arc<RwLock<ImageStore>>,
    /// Per-key fetch locks; a second caller for an in-flight key waits here
    /// instead of starting its own fetch
    in_flight: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ImageCache {
    // == Constructors ==
    /// Creates a new handle owning the given store.
    pub fn new(store: ImageStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a new cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(ImageStore::new(
            config.max_entries,
            config.max_size_bytes,
            config.max_age_ms,
            config.snapshot_enabled,
        ))
    }

    // == Get Or Fetch ==
    /// Returns the cached image for `key`, fetching it on a miss.
    ///
    /// A fresh entry is returned without invoking the fetcher. A stale or
    /// absent entry triggers the fetcher; on success the result is inserted
    /// with a fresh timestamp, evicting to budget before this call returns.
    /// On fetch failure the error is propagated unchanged and the cache is
    /// left exactly as it was.
    ///
    /// Overlapping calls for the same uncached key are serialized on a
    /// per-key lock: the first caller fetches, later callers wait and then
    /// hit the freshly inserted entry. If the first fetch fails, the next
    /// waiter runs its own fetch.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetcher: F) -> Result<ImageData>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ImageData>>,
    {
        ImageStore::validate_key(key)?;

        // Fast path: fresh hit without touching the fetch locks.
        if let Some(data) = self.store.write().await.get_fresh(key) {
            return Ok(data);
        }

        let key_lock = {
            let mut locks = self.in_flight.lock().await;
            locks.entry(key.to_string()).or_default().clone()
        };
        let guard = key_lock.lock().await;

        // Re-check: a caller we waited behind may have filled the entry.
        if let Some(data) = self.store.write().await.recheck_fresh(key) {
            drop(guard);
            self.release_fetch_lock(key, &key_lock).await;
            return Ok(data);
        }

        debug!(key, "cache miss, invoking fetcher");
        let result = match fetcher().await {
            Ok(data) => self.store.write().await.insert(key.to_string(), data),
            Err(err) => Err(err),
        };

        drop(guard);
        self.release_fetch_lock(key, &key_lock).await;
        result
    }

    /// Drops the per-key fetch lock once no other caller is waiting on it.
    async fn release_fetch_lock(&self, key: &str, lock: &Arc<Mutex<()>>) {
        let mut locks = self.in_flight.lock().await;
        if let Some(existing) = locks.get(key) {
            // One reference held by the map, one by us.
            if Arc::ptr_eq(existing, lock) && Arc::strong_count(existing) == 2 {
                locks.remove(key);
            }
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Clear ==
    /// Removes all entries and returns the number removed.
    pub async fn clear(&self) -> usize {
        self.store.write().await.clear()
    }

    // == Cleanup ==
    /// Removes entries at least as old as the threshold (configured max age
    /// when omitted) and returns the number removed.
    pub async fn cleanup(&self, max_age_ms: Option<u64>) -> usize {
        self.store.write().await.cleanup(max_age_ms)
    }

    // == Snapshot ==
    /// Returns the debug snapshot, oldest entry first.
    pub async fn snapshot(&self) -> Result<Vec<EntrySnapshot>> {
        self.store.read().await.snapshot()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}
