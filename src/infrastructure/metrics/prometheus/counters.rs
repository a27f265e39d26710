use metrics::{counter, histogram};
use std::time::Instant;

/// Increment the successful-logins counter.
pub fn increment_login() {
    counter!("logins_total").increment(1);
}

/// Increment the counter for rentals persisted through payment.
pub fn increment_rental_created() {
    counter!("rentals_created_total").increment(1);
}

/// Increment the failed-payment-submissions counter.
pub fn increment_payment_failed() {
    counter!("payments_failed_total").increment(1);
}

/// Increment the counter for sessions ended by timeout or corruption.
pub fn increment_session_expired() {
    counter!("sessions_expired_total").increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant) {
    let elapsed = start.elapsed();
    histogram!("http_request_duration_seconds").record(elapsed);
}
