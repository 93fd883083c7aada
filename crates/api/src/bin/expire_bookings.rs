//! Administrative CLI: bulk-expire stale PENDING bookings.
//!
//! Usage: expire_bookings [--dry-run] [--hours N]

use domain::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expire_bookings=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let hours = args
        .iter()
        .position(|a| a == "--hours")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(domain::booking::EXPIRY_THRESHOLD_HOURS);

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::create_pool(&database_url)
        .await
        .expect("failed to create database pool");

    let clock = SystemClock;
    let expired = db::BookingRepository::expire_stale_pending(&pool, &clock, hours, dry_run)
        .await
        .expect("scan for stale pending bookings failed");

    if dry_run {
        tracing::info!(count = expired.len(), hours, "would expire (dry run)");
    } else {
        tracing::info!(count = expired.len(), hours, "expired stale pending bookings");
        if !expired.is_empty() {
            api::metrics::record_expired(expired.len() as u64);
        }
    }

    for id in &expired {
        println!("{id}");
    }
}
