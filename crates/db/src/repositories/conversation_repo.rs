use shared::types::{order_user_pair, BookingId, ConversationId, UserId};
use shared::{AppError, DomainError};
use sqlx::PgPool;

use crate::models::Conversation;

pub struct ConversationRepository;

const UNIQUE_VIOLATION: &str = "23505";

impl ConversationRepository {
    /// Normalize the participant pair, validate booking participation if a
    /// booking is given, and return the existing conversation or insert a
    /// new one. A uniqueness race on insert is translated into a re-read —
    /// the lost race is benign, the winner is returned either way.
    pub async fn open_or_create(
        pool: &PgPool,
        actor: UserId,
        counterparty: UserId,
        booking_id: Option<BookingId>,
    ) -> Result<Conversation, AppError> {
        if let Some(booking_id) = booking_id {
            let participants: Option<(UserId, UserId)> = sqlx::query_as(
                "SELECT renter_id, owner_id FROM bookings WHERE id = $1",
            )
            .bind(booking_id.as_uuid())
            .fetch_optional(pool)
            .await?;

            let Some((renter_id, owner_id)) = participants else {
                return Err(AppError::Domain(DomainError::BookingNotFound));
            };

            if actor != renter_id && actor != owner_id {
                return Err(AppError::Domain(DomainError::ConversationNotParticipant));
            }
        }

        let (p1, p2) = order_user_pair(actor, counterparty);

        if let Some(existing) = Self::find_existing(pool, p1, p2, booking_id).await? {
            return Ok(existing);
        }

        let id = ConversationId::new();
        let insert_result = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (id, p1, p2, booking_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, p1, p2, booking_id, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(p1.as_uuid())
        .bind(p2.as_uuid())
        .bind(booking_id.map(|b| *b.as_uuid()))
        .fetch_one(pool)
        .await;

        match insert_result {
            Ok(conversation) => Ok(conversation),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Self::find_existing(pool, p1, p2, booking_id)
                    .await?
                    .ok_or_else(|| AppError::Internal("lost conversation creation race with no winner to read".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_existing(
        pool: &PgPool,
        p1: UserId,
        p2: UserId,
        booking_id: Option<BookingId>,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        match booking_id {
            Some(booking_id) => {
                sqlx::query_as::<_, Conversation>(
                    "SELECT id, p1, p2, booking_id, created_at, updated_at FROM conversations \
                     WHERE p1 = $1 AND p2 = $2 AND booking_id = $3",
                )
                .bind(p1.as_uuid())
                .bind(p2.as_uuid())
                .bind(booking_id.as_uuid())
                .fetch_optional(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Conversation>(
                    "SELECT id, p1, p2, booking_id, created_at, updated_at FROM conversations \
                     WHERE p1 = $1 AND p2 = $2 AND booking_id IS NULL",
                )
                .bind(p1.as_uuid())
                .bind(p2.as_uuid())
                .fetch_optional(pool)
                .await
            }
        }
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: ConversationId,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        sqlx::query_as::<_, Conversation>(
            "SELECT id, p1, p2, booking_id, created_at, updated_at FROM conversations WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, p1, p2, booking_id, created_at, updated_at FROM conversations
            WHERE p1 = $1 OR p2 = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(pool)
        .await
    }
}
