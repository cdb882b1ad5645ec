//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Maximum aggregate payload size in bytes
    pub max_size_bytes: usize,
    /// Age in milliseconds beyond which an entry is stale
    pub max_age_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Whether the debug snapshot endpoint is enabled
    pub snapshot_enabled: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `MAX_SIZE_BYTES` - Byte budget for payloads (default: 52428800 = 50 MiB)
    /// - `MAX_AGE_MS` - Staleness threshold in milliseconds (default: 1800000 = 30 min)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `SNAPSHOT_ENABLED` - Enable the debug snapshot endpoint (default: false)
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            max_size_bytes: env::var("MAX_SIZE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50 * 1024 * 1024),
            max_age_ms: env::var("MAX_AGE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30 * 60 * 1000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            snapshot_enabled: env::var("SNAPSHOT_ENABLED")
                .ok()
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100,
            max_size_bytes: 50 * 1024 * 1024,
            max_age_ms: 30 * 60 * 1000,
            server_port: 3000,
            cleanup_interval: 60,
            snapshot_enabled: false,
        }
    }
}
