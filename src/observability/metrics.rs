//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_total` (counter): requests by method, status
//! - `gate_request_duration_seconds` (histogram): latency distribution
//! - `gate_rate_limited_total` (counter): rejections by the rate gate
//! - `gate_guard_decisions_total` (counter): session guard outcomes
//! - `gate_credentials_issued_total` (counter): credentials signed, by reason
//!
//! # Design Decisions
//! - Uses the `metrics` facade; recording is a no-op until an exporter is installed
//! - Prometheus exporter runs on its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "gate_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "gate_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    metrics::counter!("gate_rate_limited_total").increment(1);
}

pub fn record_guard_decision(outcome: &'static str) {
    metrics::counter!("gate_guard_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_credential_issued(reason: &'static str) {
    metrics::counter!("gate_credentials_issued_total", "reason" => reason).increment(1);
}
