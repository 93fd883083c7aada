use shared::types::UserId;
use shared::{AppError, DomainError};
use sqlx::PgPool;

use crate::models::{CreateUser, UpdateUser, User};

pub struct UserRepository;

const UNIQUE_VIOLATION: &str = "23505";

impl UserRepository {
    pub async fn create(pool: &PgPool, input: CreateUser) -> Result<User, AppError> {
        let id = UserId::new();

        let existing = Self::find_by_email(pool, &input.email).await?;
        if existing.is_some() {
            return Err(AppError::Domain(DomainError::EmailAlreadyExists));
        }

        let insert_result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, first_name, last_name, phone, bio, location,
                      avatar, rating_average, review_count, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_one(pool)
        .await;

        match insert_result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(AppError::Domain(DomainError::EmailAlreadyExists))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone, bio, location,
                   avatar, rating_average, review_count, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone, bio, location,
                   avatar, rating_average, review_count, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: UserId,
        input: UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                bio = COALESCE($5, bio),
                location = COALESCE($6, location),
                avatar = COALESCE($7, avatar),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, phone, bio, location,
                      avatar, rating_average, review_count, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.bio)
        .bind(&input.location)
        .bind(&input.avatar)
        .fetch_optional(pool)
        .await
    }
}
