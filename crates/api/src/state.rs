use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

use domain::{Clock, SystemClock};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt_secret: String,
    pub clock: Arc<dyn Clock>,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(pool: PgPool, jwt_secret: String, metrics_handle: PrometheusHandle) -> Self {
        Self {
            pool,
            jwt_secret,
            clock: Arc::new(SystemClock),
            metrics_handle,
        }
    }

    /// Override the clock, e.g. with a `FixedClock` in integration tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
