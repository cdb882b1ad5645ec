//! Request DTOs for the image cache server API
//!
//! Defines the structure of incoming query parameters.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Query parameters for the image endpoint (GET /image)
///
/// # Fields
/// - `src`: The upstream image URL, also used as the cache key
#[derive(Debug, Clone, Deserialize)]
pub struct ImageParams {
    /// Upstream image URL / cache key
    pub src: String,
}

impl ImageParams {
    /// Validates the parameters.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.src.is_empty() {
            return Some("src cannot be empty".to_string());
        }
        if self.src.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "src exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

/// Query parameters for the cleanup endpoint (POST /cleanup)
///
/// # Fields
/// - `max_age_ms`: Optional age threshold; the configured max age is used
///   when omitted
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupParams {
    /// Optional age threshold in milliseconds
    #[serde(default)]
    pub max_age_ms: Option<u64>,
}
