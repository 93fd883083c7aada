use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{ConversationId, MessageId, UserId};
use sqlx::FromRow;

/// Message database model. Within a conversation, messages are totally
/// ordered by `created_at` and secondarily by `id` to break ties — callers
/// should `ORDER BY created_at, id` rather than `created_at` alone.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}
