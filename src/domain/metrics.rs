use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a successful login.
    fn record_login(&self);

    /// Record a rental persisted through the payment workflow.
    fn record_rental_created(&self);

    /// Record a payment submission that failed (validation, business or
    /// transport).
    fn record_payment_failed(&self);

    /// Record a session torn down by timeout or corruption, as opposed to
    /// an explicit logout.
    fn record_session_expired(&self);

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
