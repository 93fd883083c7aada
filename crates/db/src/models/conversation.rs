use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{BookingId, ConversationId, UserId};
use sqlx::FromRow;

/// Conversation database model. `p1 < p2` under the total order from
/// [`shared::types::order_user_pair`]; uniqueness on `(p1, p2, booking_id)`
/// treats a `NULL` `booking_id` as its own equivalence class via a partial
/// unique index, so a pair may have one general conversation plus one
/// conversation per shared booking.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub p1: UserId,
    pub p2: UserId,
    pub booking_id: Option<BookingId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn participants(&self) -> (UserId, UserId) {
        (self.p1, self.p2)
    }

    pub fn includes(&self, user: UserId) -> bool {
        self.p1 == user || self.p2 == user
    }
}
