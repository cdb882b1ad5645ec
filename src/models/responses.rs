//! Response DTOs for the image cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, EntrySnapshot};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of entries in the cache
    pub entries: usize,
    /// Aggregate payload size in bytes
    pub total_size_bytes: usize,
    /// Aggregate size in megabytes, rounded for display
    pub size_mb: f64,
    /// Key with the oldest insert/refresh timestamp, null when empty
    pub oldest_key: Option<String>,
    /// Key with the newest insert/refresh timestamp, null when empty
    pub newest_key: Option<String>,
    /// Number of fresh cache retrievals
    pub hits: u64,
    /// Number of failed retrievals (absent or stale)
    pub misses: u64,
    /// Number of entries removed by capacity eviction
    pub evictions: u64,
    /// Number of entries removed by age-based cleanup
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            entries: stats.entries,
            total_size_bytes: stats.total_size_bytes,
            size_mb: stats.size_mb,
            oldest_key: stats.oldest_key,
            newest_key: stats.newest_key,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            hit_rate,
        }
    }
}

/// Response body for the clear endpoint (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Removed {} entries", removed),
            removed,
        }
    }
}

/// Response body for the cleanup endpoint (POST /cleanup)
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl CleanupResponse {
    /// Creates a new CleanupResponse
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Removed {} aged entries", removed),
            removed,
        }
    }
}

/// Response body for the debug snapshot endpoint (GET /entries)
#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    /// Number of entries in the snapshot
    pub count: usize,
    /// Per-entry metadata, oldest first
    pub entries: Vec<EntrySnapshot>,
}

impl EntriesResponse {
    /// Creates a new EntriesResponse from a snapshot
    pub fn new(entries: Vec<EntrySnapshot>) -> Self {
        Self {
            count: entries.len(),
            entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
