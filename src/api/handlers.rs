//! API Handlers
//!
//! HTTP request handlers for each image cache server endpoint.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::{ImageCache, ImageData};
use crate::error::{CacheError, Result};
use crate::models::{
    CleanupParams, CleanupResponse, ClearResponse, EntriesResponse, HealthResponse, ImageParams,
    StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache handle is clonable and owned here; consumers never reach for a
/// global instance.
#[derive(Clone)]
pub struct AppState {
    /// Shared image cache
    pub cache: ImageCache,
    /// HTTP client used as the upstream fetcher
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates a new AppState with the given cache handle.
    pub fn new(cache: ImageCache) -> Self {
        Self {
            cache,
            http: reqwest::Client::new(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(ImageCache::from_config(config))
    }
}

/// Handler for GET /image?src=<url>
///
/// Serves the image from cache when fresh, otherwise fetches it from the
/// upstream URL, caches it, and serves the fetched bytes.
pub async fn image_handler(
    State(state): State<AppState>,
    Query(params): Query<ImageParams>,
) -> Result<Response> {
    if let Some(error_msg) = params.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let client = state.http.clone();
    let url = params.src.clone();
    let image = state
        .cache
        .get_or_fetch(&params.src, || fetch_image(client, url))
        .await?;

    Ok((
        [(header::CONTENT_TYPE, image.content_type.clone())],
        image.bytes.to_vec(),
    )
        .into_response())
}

/// Downloads an image from the upstream URL.
///
/// Non-2xx upstream responses are reported as fetch failures; no retries are
/// attempted here.
async fn fetch_image(client: reqwest::Client, url: String) -> Result<ImageData> {
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| CacheError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(CacheError::Fetch(format!(
            "Upstream returned {} for {}",
            response.status(),
            url
        )));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| CacheError::Fetch(e.to_string()))?;

    Ok(ImageData::new(bytes.to_vec(), content_type))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for POST /cleanup
///
/// Removes aged entries; the threshold defaults to the configured max age.
pub async fn cleanup_handler(
    State(state): State<AppState>,
    Query(params): Query<CleanupParams>,
) -> Json<CleanupResponse> {
    let removed = state.cache.cleanup(params.max_age_ms).await;
    Json(CleanupResponse::new(removed))
}

/// Handler for DELETE /cache
///
/// Removes all entries from the cache.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.clear().await;
    Json(ClearResponse::new(removed))
}

/// Handler for GET /entries
///
/// Returns the debug snapshot; 403 when the snapshot flag is off.
pub async fn entries_handler(State(state): State<AppState>) -> Result<Json<EntriesResponse>> {
    let snapshot = state.cache.snapshot().await?;
    Ok(Json(EntriesResponse::new(snapshot)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
