//! Recency Tracker Module
//!
//! Tracks insert/refresh order for capacity eviction.
//!
//! Eviction removes the entry with the oldest timestamp. Timestamps are
//! assigned monotonically at insert/refresh time, so the insert/refresh order
//! kept here is exactly timestamp order, with insertion order as the
//! deterministic tie-break when two entries land in the same millisecond.

use std::collections::VecDeque;

// == Recency Tracker ==
/// Tracks insert/refresh order of cache keys.
///
/// Keys are stored in a VecDeque where:
/// - Front = most recently inserted/refreshed
/// - Back = oldest
#[derive(Debug, Default)]
pub struct RecencyTracker {
    /// Keys ordered by insert/refresh time
    order: VecDeque<String>,
}

impl RecencyTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Marks a key as just inserted or refreshed (moves to front).
    ///
    /// Reads do not call this: recency here means insert/refresh recency,
    /// not access recency.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if the tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    pub fn oldest(&self) -> Option<&String> {
        self.order.back()
    }

    // == Peek Newest ==
    /// Returns the most recently inserted/refreshed key without removing it.
    pub fn newest(&self) -> Option<&String> {
        self.order.front()
    }

    // == Iterate ==
    /// Iterates keys from oldest to newest.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &String> {
        self.order.iter().rev()
    }

    // == Clear ==
    /// Removes all tracked keys.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
