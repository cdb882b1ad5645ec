//! Cache Entry Module
//!
//! Defines the structure for individual cached images with age tracking.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

// == Image Data ==
/// An image payload plus its content type.
///
/// The bytes are reference-counted so that cache hits hand out cheap clones
/// instead of copying the full payload.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw image bytes
    pub bytes: Arc<Vec<u8>>,
    /// MIME type reported by the fetcher (e.g. "image/png")
    pub content_type: String,
}

impl ImageData {
    /// Creates a new ImageData from raw bytes and a content type.
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            content_type: content_type.into(),
        }
    }

    /// Returns the payload size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// == Cache Entry ==
/// Represents a single cached image with size and age metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached image payload
    pub data: ImageData,
    /// Payload size in bytes, used for aggregate size accounting
    pub size: usize,
    /// Insert/refresh timestamp (Unix milliseconds)
    pub timestamp: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(data: ImageData) -> Self {
        let size = data.size();
        Self {
            data,
            size,
            timestamp: current_timestamp_ms(),
        }
    }

    // == Refresh ==
    /// Replaces the payload and bumps the timestamp.
    ///
    /// The new timestamp is never older than the previous one, even if the
    /// wall clock stepped backwards between insert and refresh.
    pub fn refresh(&mut self, data: ImageData) {
        self.size = data.size();
        self.data = data;
        self.timestamp = current_timestamp_ms().max(self.timestamp);
    }

    // == Age ==
    /// Returns the entry's age in milliseconds.
    ///
    /// Saturates at zero if the wall clock reads earlier than the timestamp.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.timestamp)
    }

    // == Is Stale ==
    /// Checks whether the entry is older than the given max age.
    ///
    /// Boundary condition: an entry is considered stale when its age is
    /// greater than or equal to `max_age_ms`. With a threshold of zero every
    /// entry is stale, which is what `cleanup(0)` relies on.
    pub fn is_stale(&self, max_age_ms: u64) -> bool {
        self.age_ms() >= max_age_ms
    }
}

// == Entry Snapshot ==
/// Read-only metadata view of one entry, exposed by the debug snapshot.
///
/// Carries no payload bytes; the snapshot exists for inspection, not data
/// access.
#[derive(Debug, Clone, Serialize)]
pub struct EntrySnapshot {
    /// The entry's key
    pub key: String,
    /// Payload size in bytes
    pub size: usize,
    /// Insert/refresh timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Age in milliseconds at snapshot time
    pub age_ms: u64,
    /// Stored content type
    pub content_type: String,
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
