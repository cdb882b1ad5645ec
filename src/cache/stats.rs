//! Cache Statistics Module
//!
//! Tracks cache metrics: hits, misses, evictions, expirations, and the
//! current contents summary (count, byte total, oldest/newest key).

use serde::Serialize;

// == Cache Stats ==
/// Cache metrics and contents summary.
///
/// Counters accumulate over the cache's lifetime; the contents fields
/// (`entries`, `total_size_bytes`, `size_mb`, `oldest_key`, `newest_key`)
/// are filled in when a snapshot of the stats is taken.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of fresh cache retrievals
    pub hits: u64,
    /// Number of failed retrievals (key absent or stale)
    pub misses: u64,
    /// Number of entries removed by capacity eviction
    pub evictions: u64,
    /// Number of entries removed by age-based cleanup
    pub expirations: u64,
    /// Current number of entries in the cache
    pub entries: usize,
    /// Current aggregate payload size in bytes
    pub total_size_bytes: usize,
    /// Aggregate size in megabytes, rounded to two decimals for display
    pub size_mb: f64,
    /// Key with the oldest insert/refresh timestamp, None when empty
    pub oldest_key: Option<String>,
    /// Key with the newest insert/refresh timestamp, None when empty
    pub newest_key: Option<String>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Expirations ==
    /// Adds to the expiration counter after a cleanup pass.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Set Contents ==
    /// Fills in the contents summary fields.
    pub fn set_contents(
        &mut self,
        entries: usize,
        total_size_bytes: usize,
        oldest_key: Option<String>,
        newest_key: Option<String>,
    ) {
        self.entries = entries;
        self.total_size_bytes = total_size_bytes;
        self.size_mb = round_mb(total_size_bytes);
        self.oldest_key = oldest_key;
        self.newest_key = newest_key;
    }
}

// == Utility Functions ==
/// Converts a byte count to megabytes rounded to two decimals.
pub fn round_mb(bytes: usize) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}
