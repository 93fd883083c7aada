use domain::BookingStatus;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::types::{BookingId, ReviewId, UserId};
use shared::{AppError, DomainError};
use sqlx::PgPool;

use crate::models::{CreateReview, Review, ReviewDirection};

pub struct ReviewRepository;

const UNIQUE_VIOLATION: &str = "23505";

impl ReviewRepository {
    /// Load booking, determine direction, validate, insert, and recompute
    /// the reviewed user's denormalized rating — all in one transaction,
    /// so no observer ever sees the review committed without the counters
    /// reflecting it.
    pub async fn create(pool: &PgPool, input: CreateReview) -> Result<Review, AppError> {
        let mut tx = pool.begin().await?;

        let booking: Option<(UserId, UserId, String)> = sqlx::query_as(
            "SELECT renter_id, owner_id, status FROM bookings WHERE id = $1",
        )
        .bind(input.booking_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((renter_id, owner_id, status)) = booking else {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::BookingNotFound));
        };

        let status = BookingStatus::from_db_str(&status)
            .expect("booking status column holds an unrecognized value");
        if status != BookingStatus::Completed {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::ReviewNotEligible));
        }

        let (direction, reviewed_user_id) = if input.reviewer_id == renter_id {
            (ReviewDirection::RenterToOwner, owner_id)
        } else if input.reviewer_id == owner_id {
            (ReviewDirection::OwnerToRenter, renter_id)
        } else {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::NotAuthorized));
        };

        if !(1..=5).contains(&input.rating) {
            tx.rollback().await?;
            return Err(AppError::Validation("rating must be between 1 and 5".to_string()));
        }
        if input.comment.trim().len() < 10 {
            tx.rollback().await?;
            return Err(AppError::Validation(
                "comment must be at least 10 characters".to_string(),
            ));
        }

        let id = ReviewId::new();
        let insert_result = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, booking_id, reviewer_id, reviewed_user_id, direction, rating, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, booking_id, reviewer_id, reviewed_user_id, direction, rating, comment, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.booking_id.as_uuid())
        .bind(input.reviewer_id.as_uuid())
        .bind(reviewed_user_id.as_uuid())
        .bind(direction)
        .bind(input.rating)
        .bind(&input.comment)
        .fetch_one(&mut *tx)
        .await;

        let review = match insert_result {
            Ok(review) => review,
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                tx.rollback().await?;
                return Err(AppError::Domain(DomainError::DuplicateReview));
            }
            Err(e) => return Err(e.into()),
        };

        Self::recompute_rating(&mut tx, reviewed_user_id).await?;

        tx.commit().await?;
        Ok(review)
    }

    /// Recompute `rating_average`/`review_count` from the full set of
    /// reviews where `reviewed_user = user_id`, and write both back.
    /// Uses a query-aggregation strategy rather than an incremental
    /// update — simpler to reason about and cheap at this scale.
    async fn recompute_rating(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: UserId,
    ) -> Result<(), sqlx::Error> {
        let (avg, count): (Option<Decimal>, i64) = sqlx::query_as(
            "SELECT AVG(rating)::numeric, COUNT(*) FROM reviews WHERE reviewed_user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&mut **tx)
        .await?;

        let rounded = avg.map(|a| a.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero));

        sqlx::query("UPDATE users SET rating_average = $2, review_count = $3 WHERE id = $1")
            .bind(user_id.as_uuid())
            .bind(rounded)
            .bind(count as i32)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub async fn is_eligible(
        pool: &PgPool,
        booking_id: BookingId,
        reviewer_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(String, UserId, UserId)> = sqlx::query_as(
            "SELECT status, renter_id, owner_id FROM bookings WHERE id = $1",
        )
        .bind(booking_id.as_uuid())
        .fetch_optional(pool)
        .await?;

        Ok(match row {
            Some((status, renter_id, owner_id)) => {
                status == "COMPLETED" && (reviewer_id == renter_id || reviewer_id == owner_id)
            }
            None => false,
        })
    }
}
