use domain::{authorize_transition, check_not_expired, compute_pricing, BookingActor, BookingStatus, Clock};
use rust_decimal::Decimal;
use shared::types::{BookingId, DateRange, ItemId, UserId};
use shared::{AppError, DomainError};
use sqlx::PgPool;

use crate::models::{Booking, CreateBooking};

pub struct BookingRepository;

/// Postgres error code for a tripped exclusion constraint.
const EXCLUSION_VIOLATION: &str = "23P01";

impl BookingRepository {
    /// The booking admission pipeline: transaction, per-item advisory
    /// lock, load + validate, compute pricing, insert, commit. The
    /// `bookings_no_overlap` exclusion constraint is the authoritative
    /// backstop — even if this method's own overlap scan below were
    /// skipped, the constraint still refuses the insert.
    pub async fn create(
        pool: &PgPool,
        clock: &dyn Clock,
        input: CreateBooking,
    ) -> Result<Booking, AppError> {
        let id = BookingId::new();
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
            .bind(input.item_id.as_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        let item: Option<(UserId, bool, Decimal)> = sqlx::query_as(
            "SELECT owner_id, is_active, price_per_day FROM items WHERE id = $1",
        )
        .bind(input.item_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((owner_id, is_active, price_per_day)) = item else {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::ItemNotFound));
        };

        if !is_active {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::ItemInactive));
        }

        if owner_id == input.renter_id {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::SelfBooking));
        }

        let today = clock.now().date_naive();
        if input.start_date < today {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::InvalidDateRange(
                "start date is in the past".to_string(),
            )));
        }

        let range = match DateRange::new(input.start_date, input.end_date) {
            Ok(range) => range,
            Err(e) => {
                tx.rollback().await?;
                return Err(AppError::Domain(DomainError::InvalidDateRange(e.to_string())));
            }
        };

        let conflicts: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM bookings
            WHERE item_id = $1
              AND status IN ('PENDING', 'APPROVED', 'PAYMENT_PENDING')
              AND start_date <= $3
              AND end_date >= $2
            "#,
        )
        .bind(input.item_id.as_uuid())
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&mut *tx)
        .await?;

        if conflicts.0 > 0 {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::BookingOverlap));
        }

        let pricing = compute_pricing(price_per_day, range);
        let now = clock.now();

        let insert_result = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, item_id, renter_id, owner_id, start_date, end_date, status,
                                   total_days, base_total, discount_rate, discount_amount,
                                   final_total, deposit, created_at, updated_at)
            SELECT $1, $2, $3, $4, $5, $6, 'PENDING', $7, $8, $9, $10, $11, deposit_amount, $12, $12
            FROM items WHERE id = $2
            RETURNING id, item_id, renter_id, owner_id, start_date, end_date, status, total_days,
                      base_total, discount_rate, discount_amount, final_total, deposit,
                      created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.item_id.as_uuid())
        .bind(input.renter_id.as_uuid())
        .bind(owner_id.as_uuid())
        .bind(range.start)
        .bind(range.end)
        .bind(pricing.total_days as i32)
        .bind(pricing.base_total)
        .bind(pricing.discount_rate)
        .bind(pricing.discount_amount)
        .bind(pricing.final_total)
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        let booking = match insert_result {
            Ok(booking) => booking,
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) =>
            {
                tx.rollback().await?;
                return Err(AppError::Domain(DomainError::BookingOverlap));
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(booking)
    }

    pub async fn find_by_id(pool: &PgPool, id: BookingId) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, item_id, renter_id, owner_id, start_date, end_date, status, total_days,
                   base_total, discount_rate, discount_amount, final_total, deposit,
                   created_at, updated_at
            FROM bookings WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn find_for_item(
        pool: &PgPool,
        item_id: ItemId,
        window: Option<DateRange>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        match window {
            Some(w) => {
                sqlx::query_as::<_, Booking>(
                    r#"
                    SELECT id, item_id, renter_id, owner_id, start_date, end_date, status,
                           total_days, base_total, discount_rate, discount_amount, final_total,
                           deposit, created_at, updated_at
                    FROM bookings
                    WHERE item_id = $1
                      AND status IN ('PENDING', 'APPROVED', 'PAYMENT_PENDING')
                      AND start_date <= $3 AND end_date >= $2
                    ORDER BY start_date
                    "#,
                )
                .bind(item_id.as_uuid())
                .bind(w.start)
                .bind(w.end)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Booking>(
                    r#"
                    SELECT id, item_id, renter_id, owner_id, start_date, end_date, status,
                           total_days, base_total, discount_rate, discount_amount, final_total,
                           deposit, created_at, updated_at
                    FROM bookings
                    WHERE item_id = $1
                      AND status IN ('PENDING', 'APPROVED', 'PAYMENT_PENDING')
                    ORDER BY start_date
                    "#,
                )
                .bind(item_id.as_uuid())
                .fetch_all(pool)
                .await
            }
        }
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        as_renter: bool,
        as_owner: bool,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = r#"
            SELECT id, item_id, renter_id, owner_id, start_date, end_date, status, total_days,
                   base_total, discount_rate, discount_amount, final_total, deposit,
                   created_at, updated_at
            FROM bookings
            WHERE ($2 AND renter_id = $1) OR ($3 AND owner_id = $1)
            ORDER BY created_at DESC
        "#;

        sqlx::query_as::<_, Booking>(query)
            .bind(user_id.as_uuid())
            .bind(as_renter)
            .bind(as_owner)
            .fetch_all(pool)
            .await
    }

    /// Load the booking under the per-item serialization primitive,
    /// authorize and validate the transition, persist the new status.
    pub async fn transition(
        pool: &PgPool,
        clock: &dyn Clock,
        booking_id: BookingId,
        actor_id: UserId,
        to: BookingStatus,
    ) -> Result<Booking, AppError> {
        let mut tx = pool.begin().await?;

        let item_id: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT item_id FROM bookings WHERE id = $1")
                .bind(booking_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        let Some((item_id,)) = item_id else {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::BookingNotFound));
        };

        // Acquire the per-item serialization primitive *before* reading the
        // row the transition decision is based on, so a concurrent
        // transition on the same item can't be authorized against state
        // that this one is about to overwrite.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
            .bind(item_id.to_string())
            .execute(&mut *tx)
            .await?;

        let booking: Option<Booking> = sqlx::query_as(
            r#"
            SELECT id, item_id, renter_id, owner_id, start_date, end_date, status, total_days,
                   base_total, discount_rate, discount_amount, final_total, deposit,
                   created_at, updated_at
            FROM bookings WHERE id = $1
            "#,
        )
        .bind(booking_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booking) = booking else {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::BookingNotFound));
        };

        let actor = if actor_id == booking.renter_id {
            BookingActor::Renter
        } else if actor_id == booking.owner_id {
            BookingActor::Owner
        } else {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::NotAuthorized));
        };

        let from = booking.status();
        if let Err(e) = authorize_transition(from, to, actor) {
            tx.rollback().await?;
            return Err(e.into());
        }

        if from == BookingStatus::Pending && to == BookingStatus::Approved {
            if let Err(e) = check_not_expired(booking.created_at, clock.now()) {
                tx.rollback().await?;
                return Err(e.into());
            }
        }

        // Guarded by `AND status = $3` even though the advisory lock above
        // already serializes every transition on this item: the guard is
        // what turns a stale write into a distinguishable conflict instead
        // of a silent overwrite, the same idiom the teacher uses for its
        // own state-sensitive updates.
        let updated: Option<Booking> = sqlx::query_as(
            r#"
            UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1 AND status = $3
            RETURNING id, item_id, renter_id, owner_id, start_date, end_date, status, total_days,
                      base_total, discount_rate, discount_amount, final_total, deposit,
                      created_at, updated_at
            "#,
        )
        .bind(booking_id.as_uuid())
        .bind(to.as_db_str())
        .bind(from.as_db_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Err(AppError::Domain(DomainError::InvalidTransition));
        };

        tx.commit().await?;
        Ok(updated)
    }

    /// Select PENDING bookings past `threshold_hours`, skipping any whose
    /// per-item advisory lock is currently held (`pg_try_advisory_xact_lock`
    /// is non-blocking), and cancel them. `dry_run` performs the scan but
    /// commits nothing. Idempotent: a booking already transitioned out of
    /// PENDING by a racing caller simply won't match the `WHERE` clause on
    /// a later invocation.
    pub async fn expire_stale_pending(
        pool: &PgPool,
        clock: &dyn Clock,
        threshold_hours: i64,
        dry_run: bool,
    ) -> Result<Vec<BookingId>, AppError> {
        let cutoff = clock.now() - chrono::Duration::hours(threshold_hours);
        let mut tx = pool.begin().await?;

        let candidates: Vec<(uuid::Uuid, uuid::Uuid)> = sqlx::query_as(
            r#"
            SELECT id, item_id FROM bookings
            WHERE status = 'PENDING' AND created_at <= $1
            "#,
        )
        .bind(cutoff)
        .fetch_all(&mut *tx)
        .await?;

        let mut expired = Vec::new();
        for (booking_uuid, item_uuid) in candidates {
            let lock_acquired: (bool,) =
                sqlx::query_as("SELECT pg_try_advisory_xact_lock(hashtext($1::text))")
                    .bind(item_uuid.to_string())
                    .fetch_one(&mut *tx)
                    .await?;

            if !lock_acquired.0 {
                continue;
            }

            if dry_run {
                expired.push(BookingId::from_uuid(booking_uuid));
                continue;
            }

            sqlx::query(
                "UPDATE bookings SET status = 'CANCELLED', updated_at = NOW() WHERE id = $1 AND status = 'PENDING'",
            )
            .bind(booking_uuid)
            .execute(&mut *tx)
            .await?;

            expired.push(BookingId::from_uuid(booking_uuid));
        }

        if dry_run {
            tx.rollback().await?;
        } else {
            tx.commit().await?;
        }

        Ok(expired)
    }
}
