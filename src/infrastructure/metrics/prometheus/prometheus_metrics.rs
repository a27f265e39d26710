//! Prometheus metrics implementation.
//!
//! Concrete implementation of the `Metrics` trait delegating to utility
//! functions in sibling modules (`counters.rs`, `recorder.rs`), which
//! handle the actual collection via the global `metrics` crate registry.
//! Counters register themselves on first use; a single global handle in
//! `recorder.rs` renders everything in Prometheus text format.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// Intentionally empty: all state lives in the global metrics registry,
/// reached through the `counter!()`/`histogram!()` macros.
pub struct PrometheusMetrics {
    // Empty - uses global metrics registry pattern
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        // Use the recorder utility to get actual metrics
        super::render_metrics()
    }

    fn record_login(&self) {
        super::increment_login();
    }

    fn record_rental_created(&self) {
        tracing::debug!("Recording rental created event");
        super::increment_rental_created();
    }

    fn record_payment_failed(&self) {
        super::increment_payment_failed();
    }

    fn record_session_expired(&self) {
        super::increment_session_expired();
    }

    fn record_http_request(&self, start: Instant, _path: &str, _method: &str, _status: u16) {
        super::track_http_request(start);
    }
}
