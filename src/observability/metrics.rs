//! Metrics collection and exposition.
//!
//! # Metrics
//! - `storefront_requests_total` (counter): page requests by status, bot
//! - `storefront_request_duration_seconds` (histogram): time to response head
//! - `storefront_render_errors_total` (counter): errors reported by the renderer

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed page response.
pub fn record_request(status: u16, bot: bool, start: Instant) {
    let status = status.to_string();
    let bot = if bot { "true" } else { "false" };
    counter!("storefront_requests_total", "status" => status.clone(), "bot" => bot).increment(1);
    histogram!("storefront_request_duration_seconds", "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record a render error.
pub fn record_render_error() {
    counter!("storefront_render_errors_total").increment(1);
}
