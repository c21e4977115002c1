use crate::error::ServerResult;
use crate::state::{ServerMetadata, ServerState};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

/// Pins the uptime origin. Called once by `start_server` before binding.
pub fn mark_started() -> SystemTime {
    *once_cell::sync::Lazy::force(&SERVER_START_TIME)
}

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "assessrec-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// The recommender is built before the listener binds, so a running server
/// is always ready; the body reports what it serves.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let engine = &state.recommender;
    Json(json!({
        "status": "ready",
        "service": "assessrec-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "catalog": { "items": engine.catalog().len() },
            "index": { "kind": engine.index_kind(), "vectors": engine.index_len() },
            "embedder": { "model": engine.model_name() },
        }
    }))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let body = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

/// Server metadata endpoint (authenticated)
pub async fn server_metadata(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<ServerMetadata>> {
    let engine = &state.recommender;
    Ok(Json(ServerMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime_seconds(),
        catalog_size: engine.catalog().len(),
        index_kind: engine.index_kind().to_string(),
        embedding_model: engine.model_name().to_string(),
        max_k: engine.config().max_k,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn start_time_is_fixed_by_first_mark() {
        let first = mark_started();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(mark_started(), first);
        assert!(first.elapsed().unwrap() >= Duration::from_millis(20));
    }
}
