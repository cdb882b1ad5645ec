//! API Module
//!
//! HTTP handlers and routing for the image cache server REST API.
//!
//! # Endpoints
//! - `GET /image?src=<url>` - Serve an image through the cache
//! - `GET /stats` - Get cache statistics
//! - `POST /cleanup` - Remove aged entries
//! - `DELETE /cache` - Remove all entries
//! - `GET /entries` - Debug snapshot (403 unless enabled)
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
