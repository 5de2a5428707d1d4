//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): gate and locale outcomes by `decision`
//! - `gate_requests_total` (counter): responses by `status`
//! - `gate_request_duration_seconds` (histogram): time spent per request
//! - `gate_upstream_errors_total` (counter): failed forwards to the renderer

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_decision(decision: &'static str) {
    metrics::counter!("gate_decisions_total", "decision" => decision).increment(1);
}

pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("gate_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("gate_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error() {
    metrics::counter!("gate_upstream_errors_total").increment(1);
}
