//! Metrics collection and exposition.
//!
//! # Metrics
//! - `employee_api_requests_total` (counter): requests by method, route, status
//! - `employee_api_request_duration_seconds` (histogram): handler latency
//! - `employee_api_upstream_calls_total` (counter): upstream calls by operation, outcome
//! - `employee_api_upstream_duration_seconds` (histogram): upstream latency
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "employee_api_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "employee_api_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call (after any retries).
pub fn record_upstream_call(operation: &'static str, outcome: &str, start: Instant) {
    metrics::counter!(
        "employee_api_upstream_calls_total",
        "operation" => operation,
        "outcome" => outcome.to_string()
    )
    .increment(1);

    metrics::histogram!("employee_api_upstream_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}
