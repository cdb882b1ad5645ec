//! Error types for the image cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the image cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or otherwise unusable
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream fetch failed; the cache is left untouched
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Debug snapshot requested while the snapshot flag is off
    #[error("Snapshot endpoint is disabled")]
    SnapshotDisabled,

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::InvalidKey(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Fetch(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::SnapshotDisabled => (StatusCode::FORBIDDEN, self.to_string()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the image cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
