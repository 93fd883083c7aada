use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::types::UserId;
use sqlx::FromRow;

/// User database model.
///
/// `rating_average`/`review_count` are denormalized from the set of
/// COMPLETED bookings' reviews where `reviewed_user = id`; the only writer
/// is [`crate::repositories::ReviewRepository::create`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    pub rating_average: Option<Decimal>,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Sparse field-by-field profile update. Recognized keys only:
/// `firstName, lastName, phone, bio, location, avatar`; unknown keys are
/// rejected rather than silently ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
}
