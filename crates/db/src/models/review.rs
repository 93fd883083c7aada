use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{BookingId, ReviewId, UserId};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_direction", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDirection {
    RenterToOwner,
    OwnerToRenter,
}

/// Review database model. Uniqueness on `(booking, direction)` is enforced
/// by a storage-layer unique constraint; a violation is translated by
/// [`crate::repositories::ReviewRepository::create`] into `DuplicateReview`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    pub reviewer_id: UserId,
    pub reviewed_user_id: UserId,
    pub direction: ReviewDirection,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

pub struct CreateReview {
    pub booking_id: BookingId,
    pub reviewer_id: UserId,
    pub rating: i16,
    pub comment: String,
}
