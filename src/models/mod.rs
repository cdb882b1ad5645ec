//! Request and Response models for the image cache server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request parameters and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CleanupParams, ImageParams};
pub use responses::{
    CleanupResponse, ClearResponse, EntriesResponse, ErrorResponse, HealthResponse, StatsResponse,
};
