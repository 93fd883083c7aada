use chrono::{DateTime, NaiveDate, Utc};
use domain::BookingStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::types::{BookingId, ItemId, UserId};
use sqlx::FromRow;

/// Booking database model. `owner` is denormalized from `item.owner` at
/// creation time and never mutated afterward — the creation transaction is
/// its only writer. The pricing snapshot fields (`total_days` through
/// `final_total`) are likewise set once at creation and never mutated;
/// `deposit` is snapshotted from the item separately and is not part of
/// `final_total`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub item_id: ItemId,
    pub renter_id: UserId,
    pub owner_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub total_days: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Status is stored as `TEXT` rather than a native Postgres enum so
    /// [`domain::BookingStatus`] can stay the single authority for legal
    /// values without a migration-side enum to keep in sync.
    pub fn status(&self) -> BookingStatus {
        BookingStatus::from_db_str(&self.status)
            .unwrap_or_else(|| panic!("unrecognized booking status in storage: {}", self.status))
    }
}

pub struct CreateBooking {
    pub item_id: ItemId,
    pub renter_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
