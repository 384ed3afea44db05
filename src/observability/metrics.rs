//! Metrics collection and exposition.
//!
//! # Metrics
//! - `employees_http_requests_total` (counter): requests by method, route, status
//! - `employees_http_request_duration_seconds` (histogram): latency distribution
//!
//! Routes are labelled with their matched template (`/employees/{id}`),
//! never the raw path, to keep label cardinality bounded.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "employees_http_requests_total";
pub const REQUEST_DURATION: &str = "employees_http_request_duration_seconds";

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("path", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!(REQUESTS_TOTAL, &labels[..]).increment(1);
    metrics::histogram!(REQUEST_DURATION, &labels[..]).record(start.elapsed().as_secs_f64());
}
