//! API route handlers
//!
//! - `health`: liveness, readiness, metrics and metadata
//! - `recommend`: assessment recommendations for a text or a URL

pub mod health;
pub mod recommend;

use crate::error::ServerError;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info (GET /, no authentication)
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": "Assessment Recommender",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/recommend",
            "/api/v1/metadata",
            "/health",
            "/ready",
            "/metrics"
        ]
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
