//! Metrics collection and exposition.
//!
//! # Metrics
//! - `static_alias_resolutions_total` (counter): resolutions by outcome
//! - `static_alias_requests_total` (counter): responses by status
//! - `static_alias_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are low-cardinality (outcome, status code)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one resolution outcome (`serve`, `forbidden`, `error`).
pub fn record_resolution(outcome: &'static str) {
    metrics::counter!("static_alias_resolutions_total", "outcome" => outcome).increment(1);
}

/// Count one response and its latency.
pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("static_alias_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("static_alias_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
