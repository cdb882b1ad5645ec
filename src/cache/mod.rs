//! Cache Module
//!
//! Provides in-memory image caching with age-based expiry and capacity
//! eviction by entry count and byte budget.

mod entry;
mod handle;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, EntrySnapshot, ImageData};
pub use handle::ImageCache;
pub use recency::RecencyTracker;
pub use stats::CacheStats;
pub use store::ImageStore;

// == Public Constants ==
/// Maximum allowed key length in bytes.
///
/// Keys are typically full image URLs, so the cap is generous.
pub const MAX_KEY_LENGTH: usize = 2048;
