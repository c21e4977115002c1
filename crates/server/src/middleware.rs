//! Request middleware: API-key gate, request ids and access logging.

use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;

const API_KEY_HEADER: &str = "x-api-key";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id attached to request extensions by [`request_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Key from `X-API-Key`, else from `Authorization` with or without `Bearer `.
pub fn presented_api_key(headers: &HeaderMap) -> Option<&str> {
    let raw = headers
        .get(API_KEY_HEADER)
        .or_else(|| headers.get(AUTHORIZATION))?
        .to_str()
        .ok()?;
    let key = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!key.is_empty()).then_some(key)
}

/// Rejects unknown keys with 401 and keys over their window budget with 429.
pub async fn api_key_auth(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let key = presented_api_key(request.headers()).ok_or_else(|| {
        ServerError::Authentication(
            "API key required in 'X-API-Key' or 'Authorization: Bearer <key>'".to_string(),
        )
    })?;
    if !state.is_valid_api_key(key) {
        return Err(ServerError::Authentication("Invalid API key".to_string()));
    }
    if !state.check_rate_limit(key) {
        tracing::info!(uri = %request.uri(), "rate_limited");
        return Err(ServerError::RateLimitExceeded);
    }
    Ok(next.run(request).await)
}

/// Reuses an incoming `X-Request-Id` or mints a v4 uuid, and echoes it back.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// One `request_completed` event per request plus an HTTP status counter.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let response = next.run(request).await;
    let status = response.status();
    metrics::counter!("assessrec_http_requests_total", "status" => status.as_u16().to_string())
        .increment(1);
    tracing::info!(
        %method,
        %uri,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        request_id = %id,
        "request_completed"
    );
    response
}
