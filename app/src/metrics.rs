//! Business metrics for Eventbook.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `eventbook_bookings_total{outcome}` - Booking attempts by outcome
//!   (`created`, `conflict`, `capacity_exceeded`, `not_found`, `error`)
//! - `eventbook_events_total{action}` - Admin event changes (`created`,
//!   `updated`, `deleted`)
//! - `eventbook_signups_total` - Registered accounts
//! - `eventbook_uploads_total{status}` - Image uploads (`success`, `failure`)
//!
//! Without an installed recorder every `record_*` call is a no-op, so tests
//! need no setup.

use metrics::describe_counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize and register all business metrics descriptions.
///
/// Call once at startup, after the recorder is installed.
pub fn register_business_metrics() {
    describe_counter!(
        "eventbook_bookings_total",
        "Booking attempts by outcome (created, conflict, capacity_exceeded, not_found, error)"
    );
    describe_counter!(
        "eventbook_events_total",
        "Events changed through the admin API by action (created, updated, deleted)"
    );
    describe_counter!("eventbook_signups_total", "Accounts registered");
    describe_counter!(
        "eventbook_uploads_total",
        "Image uploads by status (success, failure)"
    );

    tracing::info!("Business metrics registered");
}

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Returns [`BuildError`] if a recorder is already installed.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record the outcome of a booking attempt.
pub fn record_booking(outcome: &'static str) {
    metrics::counter!("eventbook_bookings_total", "outcome" => outcome).increment(1);
    tracing::debug!(outcome, "Recorded booking metric");
}

/// Record an admin change to an event.
pub fn record_event_change(action: &'static str) {
    metrics::counter!("eventbook_events_total", "action" => action).increment(1);
}

/// Record a new account.
pub fn record_signup() {
    metrics::counter!("eventbook_signups_total").increment(1);
}

/// Record an image upload attempt.
pub fn record_upload(success: bool) {
    let status = if success { "success" } else { "failure" };
    metrics::counter!("eventbook_uploads_total", "status" => status).increment(1);
}
