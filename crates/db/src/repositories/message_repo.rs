use shared::types::{ConversationId, MessageId, UserId};
use shared::{AppError, DomainError};
use sqlx::PgPool;

use crate::models::{Conversation, Message};

pub struct MessageRepository;

impl MessageRepository {
    /// Append a message, rejecting non-participants, and bump the
    /// conversation's `updated_at` in the same transaction.
    pub async fn send(
        pool: &PgPool,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
    ) -> Result<Message, AppError> {
        let mut tx = pool.begin().await?;

        let conversation: Option<Conversation> = sqlx::query_as(
            "SELECT id, p1, p2, booking_id, created_at, updated_at FROM conversations WHERE id = $1",
        )
        .bind(conversation_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(conversation) = conversation else {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::ConversationNotFound));
        };

        if !conversation.includes(sender_id) {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::ConversationNotParticipant));
        }

        let id = MessageId::new();
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, is_read)
            VALUES ($1, $2, $3, $4, false)
            RETURNING id, conversation_id, sender_id, content, created_at, is_read
            "#,
        )
        .bind(id.as_uuid())
        .bind(conversation_id.as_uuid())
        .bind(sender_id.as_uuid())
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// Messages of a conversation, totally ordered by `created_at` and
    /// secondarily by `id` to break ties.
    pub async fn list(
        pool: &PgPool,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, created_at, is_read
            FROM messages WHERE conversation_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(conversation_id.as_uuid())
        .fetch_all(pool)
        .await
    }

    /// Mark every message not sent by `actor` as read.
    pub async fn mark_read(
        pool: &PgPool,
        conversation_id: ConversationId,
        actor: UserId,
    ) -> Result<u64, AppError> {
        let conversation: Option<Conversation> = sqlx::query_as(
            "SELECT id, p1, p2, booking_id, created_at, updated_at FROM conversations WHERE id = $1",
        )
        .bind(conversation_id.as_uuid())
        .fetch_optional(pool)
        .await?;

        let Some(conversation) = conversation else {
            return Err(AppError::Domain(DomainError::ConversationNotFound));
        };

        if !conversation.includes(actor) {
            return Err(AppError::Domain(DomainError::ConversationNotParticipant));
        }

        let result = sqlx::query(
            "UPDATE messages SET is_read = true WHERE conversation_id = $1 AND sender_id != $2",
        )
        .bind(conversation_id.as_uuid())
        .bind(actor.as_uuid())
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
