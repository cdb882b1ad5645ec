//! Image Store Module
//!
//! Main cache engine combining HashMap storage with insert/refresh recency
//! tracking, capacity eviction by entry count and byte budget, and age-based
//! staleness.

use std::collections::HashMap;

use crate::cache::{
    CacheEntry, CacheStats, EntrySnapshot, ImageData, RecencyTracker, MAX_KEY_LENGTH,
};
use crate::error::{CacheError, Result};

// == Image Store ==
/// In-memory image store with count/byte budgets and age-based expiry.
///
/// Aggregate size is tracked incrementally: every insert, refresh, eviction,
/// cleanup, and clear adjusts `total_size_bytes` so that it always equals the
/// sum of the stored entry sizes.
#[derive(Debug)]
pub struct ImageStore {
    /// Key-to-entry storage
    entries: HashMap<String, CacheEntry>,
    /// Insert/refresh order tracker used for eviction
    recency: RecencyTracker,
    /// Hit/miss/eviction/expiration counters
    stats: CacheStats,
    /// Running sum of entry sizes in bytes
    total_size_bytes: usize,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Maximum aggregate payload size in bytes
    max_size_bytes: usize,
    /// Age in milliseconds beyond which an entry is stale
    max_age_ms: u64,
    /// Whether the debug snapshot is allowed
    snapshot_enabled: bool,
}

impl ImageStore {
    // == Constructor ==
    /// Creates a new ImageStore with the given budgets and max age.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `max_size_bytes` - Maximum aggregate payload size in bytes
    /// * `max_age_ms` - Age in milliseconds beyond which an entry is stale
    /// * `snapshot_enabled` - Whether the debug snapshot is allowed
    pub fn new(
        max_entries: usize,
        max_size_bytes: usize,
        max_age_ms: u64,
        snapshot_enabled: bool,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyTracker::new(),
            stats: CacheStats::new(),
            total_size_bytes: 0,
            max_entries,
            max_size_bytes,
            max_age_ms,
            snapshot_enabled,
        }
    }

    // == Validate Key ==
    /// Rejects empty and oversized keys before any fetch or mutation.
    pub fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        Ok(())
    }

    // == Get Fresh ==
    /// Returns the cached image if the key is present and not stale.
    ///
    /// A stale entry is treated as a miss and left in place; it stays visible
    /// to `stats`, `cleanup`, and the snapshot until it is overwritten or
    /// removed.
    pub fn get_fresh(&mut self, key: &str) -> Option<ImageData> {
        let found = self.lookup_fresh(key);
        match &found {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        found
    }

    // == Recheck Fresh ==
    /// Re-check used after waiting on a fetch lock.
    ///
    /// Counts a hit when the entry appeared while waiting, but does not count
    /// a second miss for a lookup whose miss was already recorded by
    /// [`get_fresh`](Self::get_fresh).
    pub fn recheck_fresh(&mut self, key: &str) -> Option<ImageData> {
        let found = self.lookup_fresh(key);
        if found.is_some() {
            self.stats.record_hit();
        }
        found
    }

    /// Shared fresh-entry lookup; no counter side effects.
    fn lookup_fresh(&self, key: &str) -> Option<ImageData> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_stale(self.max_age_ms) => Some(entry.data.clone()),
            _ => None,
        }
    }

    // == Insert ==
    /// Inserts or refreshes an entry, evicting to budget afterwards.
    ///
    /// If the key already exists its payload is replaced and its timestamp
    /// bumped. Eviction removes oldest entries until both the count and byte
    /// budgets hold, but never the entry just inserted. Payloads larger than
    /// the whole byte budget are rejected up front, otherwise the budget
    /// could never be satisfied.
    pub fn insert(&mut self, key: String, data: ImageData) -> Result<ImageData> {
        Self::validate_key(&key)?;

        if data.size() > self.max_size_bytes {
            return Err(CacheError::InvalidRequest(format!(
                "Payload of {} bytes exceeds cache budget of {} bytes",
                data.size(),
                self.max_size_bytes
            )));
        }

        if let Some(entry) = self.entries.get_mut(&key) {
            self.total_size_bytes -= entry.size;
            entry.refresh(data);
            self.total_size_bytes += entry.size;
        } else {
            let entry = CacheEntry::new(data);
            self.total_size_bytes += entry.size;
            self.entries.insert(key.clone(), entry);
        }
        self.recency.record(&key);

        self.evict_to_budget(&key);

        // The protected key survives eviction, so the lookup cannot miss.
        self.entries
            .get(&key)
            .map(|entry| entry.data.clone())
            .ok_or_else(|| CacheError::Internal("Inserted entry missing".to_string()))
    }

    // == Evict To Budget ==
    /// Removes oldest entries until both budgets hold.
    ///
    /// `protect` is the key currently being inserted; if it becomes the
    /// oldest remaining entry, eviction stops even if a budget is still
    /// exceeded (only possible with a zero entry budget).
    fn evict_to_budget(&mut self, protect: &str) {
        while self.entries.len() > self.max_entries || self.total_size_bytes > self.max_size_bytes {
            let oldest = match self.recency.oldest() {
                Some(key) if key != protect => key.clone(),
                _ => break,
            };

            self.recency.remove(&oldest);
            if let Some(entry) = self.entries.remove(&oldest) {
                self.total_size_bytes -= entry.size;
            }
            self.stats.record_eviction();
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_contents(
            self.entries.len(),
            self.total_size_bytes,
            self.recency.oldest().cloned(),
            self.recency.newest().cloned(),
        );
        stats
    }

    // == Clear ==
    /// Removes all entries and returns the number removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.recency.clear();
        self.total_size_bytes = 0;
        count
    }

    // == Cleanup ==
    /// Removes all entries at least as old as the given threshold.
    ///
    /// Falls back to the configured max age when no threshold is given.
    /// Returns the number of entries removed. Fresh entries are never
    /// touched, regardless of capacity pressure.
    pub fn cleanup(&mut self, max_age_ms: Option<u64>) -> usize {
        let threshold = max_age_ms.unwrap_or(self.max_age_ms);

        let aged_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_stale(threshold))
            .map(|(key, _)| key.clone())
            .collect();

        let count = aged_keys.len();

        for key in aged_keys {
            if let Some(entry) = self.entries.remove(&key) {
                self.total_size_bytes -= entry.size;
            }
            self.recency.remove(&key);
        }

        self.stats.record_expirations(count);
        count
    }

    // == Snapshot ==
    /// Returns a read-only metadata view of every entry, oldest first.
    ///
    /// Only available when the store was built with the snapshot flag on.
    pub fn snapshot(&self) -> Result<Vec<EntrySnapshot>> {
        if !self.snapshot_enabled {
            return Err(CacheError::SnapshotDisabled);
        }

        Ok(self
            .recency
            .iter_oldest_first()
            .filter_map(|key| {
                self.entries.get(key).map(|entry| EntrySnapshot {
                    key: key.clone(),
                    size: entry.size,
                    timestamp: entry.timestamp,
                    age_ms: entry.age_ms(),
                    content_type: entry.data.content_type.clone(),
                })
            })
            .collect())
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Total Size ==
    /// Returns the tracked aggregate payload size in bytes.
    pub fn total_size_bytes(&self) -> usize {
        self.total_size_bytes
    }

    // == Test Helpers ==
    /// Rewinds an entry's timestamp so tests can age it deterministically.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &str, by_ms: u64) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.timestamp -= by_ms;
        }
    }

    /// Recomputes the aggregate size from scratch, for drift checks.
    #[cfg(test)]
    pub(crate) fn recomputed_size(&self) -> usize {
        self.entries.values().map(|entry| entry.size).sum()
    }
}
