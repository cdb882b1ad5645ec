//! Pixcache - A lightweight in-memory image cache server
//!
//! Caches fetched image payloads by key with age-based expiry and capacity
//! eviction bounded by entry count and byte budget.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{ImageCache, ImageData};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
