//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define relay metrics (requests by outcome, upstream latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by outcome
//! - `relay_upstream_duration_seconds` (histogram): outbound call latency
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests and
//!   metrics-disabled deployments pay nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one handled request.
pub fn record_request(method: &str, outcome: &'static str) {
    metrics::counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome,
    )
    .increment(1);
}

/// Record the latency of the outbound call.
pub fn record_upstream(outcome: &'static str, start: Instant) {
    metrics::histogram!(
        "relay_upstream_duration_seconds",
        "outcome" => outcome,
    )
    .record(start.elapsed().as_secs_f64());
}
