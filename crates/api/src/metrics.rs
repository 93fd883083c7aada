//! Prometheus metrics for the booking kernel.

use metrics::{counter, histogram};
use std::time::Instant;

/// Metric names for booking operations.
pub mod names {
    pub const BOOKINGS_CREATED: &str = "bookings_created_total";
    pub const BOOKING_OVERLAPS: &str = "booking_overlaps_total";
    pub const BOOKING_CREATION_DURATION: &str = "booking_creation_duration_seconds";
    pub const BOOKING_TRANSITIONS: &str = "booking_transitions_total";
    pub const BOOKINGS_EXPIRED: &str = "bookings_expired_total";
    pub const REVIEWS_CREATED: &str = "reviews_created_total";
}

/// Record a successful booking creation.
pub fn record_booking_created() {
    counter!(names::BOOKINGS_CREATED, "status" => "success").increment(1);
}

/// Record a booking creation rejected by the overlap invariant.
pub fn record_booking_overlap() {
    counter!(names::BOOKING_OVERLAPS).increment(1);
    counter!(names::BOOKINGS_CREATED, "status" => "overlap").increment(1);
}

/// Record a booking status transition, tagged by the target status.
pub fn record_transition(to_status: &str) {
    counter!(names::BOOKING_TRANSITIONS, "to" => to_status.to_string()).increment(1);
}

/// Record the number of bookings cancelled by one Scheduled Expirer run.
pub fn record_expired(count: u64) {
    counter!(names::BOOKINGS_EXPIRED).increment(count);
}

/// Record a successfully committed review.
pub fn record_review_created() {
    counter!(names::REVIEWS_CREATED).increment(1);
}

/// Time a booking creation attempt and record its duration on drop.
pub struct BookingCreationTimer {
    start: Instant,
}

impl BookingCreationTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn record(self) {
        histogram!(names::BOOKING_CREATION_DURATION).record(self.start.elapsed().as_secs_f64());
    }
}

/// Initialize the Prometheus metrics exporter. Returns a handle used to
/// render the `/metrics` endpoint.
pub fn init_metrics() -> metrics_exporter_prometheus::PrometheusHandle {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    builder
        .install_recorder()
        .expect("failed to install Prometheus metrics recorder")
}
