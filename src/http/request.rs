//! Request-level middleware.
//!
//! # Responsibilities
//! - Request ID generation (UUID v4) and propagation via `x-request-id`
//! - Request spans carrying the request ID
//! - Per-route request metrics

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Read the request ID assigned by the request-id layer.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span for one inbound request.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request),
    )
}

/// Record method, matched route, status and latency of every request.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    crate::observability::metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
