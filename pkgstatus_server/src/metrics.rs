//! Prometheus metrics for build status observability.

use std::time::Duration;

use metrics::{counter, histogram};

/// Initialize metrics exporter (Prometheus).
pub fn init_metrics() {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record a build listing and how many builds it returned.
pub fn builds_listed(count: usize) {
    counter!("pkgstatus_listings_total").increment(1);
    histogram!("pkgstatus_listing_size").record(count as f64);
}

/// Record a build detail lookup.
pub fn build_lookup(found: bool) {
    let outcome = if found { "found" } else { "missing" };
    counter!("pkgstatus_build_lookups_total", "outcome" => outcome).increment(1);
}

/// Record an issued node redirect.
pub fn redirect_issued(mode: &'static str) {
    counter!("pkgstatus_redirects_total", "mode" => mode).increment(1);
}

/// Record a failed store round-trip.
pub fn store_error(kind: &'static str) {
    counter!("pkgstatus_store_errors_total", "kind" => kind).increment(1);
}

/// Record store round-trip latency.
pub fn store_latency(operation: &'static str, elapsed: Duration) {
    histogram!("pkgstatus_store_duration_ms", "operation" => operation)
        .record(elapsed.as_secs_f64() * 1000.0);
}
