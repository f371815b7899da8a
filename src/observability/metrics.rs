//! Metrics collection and exposition.
//!
//! # Metrics
//! - `calira_requests_total` (counter): requests by method, path, status
//! - `calira_request_duration_seconds` (histogram): latency distribution
//! - `calira_rate_limited_total` (counter): 429 rejections
//! - `calira_origin_rejected_total` (counter): 403 domain rejections

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    metrics::counter!(
        "calira_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "calira_request_duration_seconds",
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a 429 rejection.
pub fn record_rate_limited() {
    metrics::counter!("calira_rate_limited_total").increment(1);
}

/// Record a 403 unauthorized-domain rejection.
pub fn record_origin_rejected() {
    metrics::counter!("calira_origin_rejected_total").increment(1);
}
