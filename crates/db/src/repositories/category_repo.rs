use shared::types::CategoryId;
use shared::{AppError, DomainError};
use sqlx::PgPool;

use crate::models::{Category, CreateCategory};

pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn create(pool: &PgPool, input: CreateCategory) -> Result<Category, AppError> {
        if let Some(parent_id) = input.parent_id {
            Self::ensure_acyclic(pool, None, Some(parent_id)).await?;
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (slug, name, parent_id, icon)
            VALUES ($1, $2, $3, $4)
            RETURNING id, slug, name, parent_id, icon
            "#,
        )
        .bind(&input.slug)
        .bind(&input.name)
        .bind(input.parent_id.map(|id| id.as_i32()))
        .bind(&input.icon)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: CategoryId,
    ) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, slug, name, parent_id, icon FROM categories WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, slug, name, parent_id, icon FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, slug, name, parent_id, icon FROM categories ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Repoint a category's parent, rejecting it if `new_parent` is `id`
    /// itself or a descendant of `id` — either would create a cycle.
    pub async fn reparent(
        pool: &PgPool,
        id: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> Result<Category, AppError> {
        if let Some(parent_id) = new_parent {
            Self::ensure_acyclic(pool, Some(id), Some(parent_id)).await?;
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET parent_id = $2 WHERE id = $1
            RETURNING id, slug, name, parent_id, icon
            "#,
        )
        .bind(id.as_i32())
        .bind(new_parent.map(|p| p.as_i32()))
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    /// Deleting a category cascades to descendants (enforced by an
    /// `ON DELETE CASCADE` foreign key on `parent_id`); items referencing
    /// any deleted category become uncategorized via `ON DELETE SET NULL`
    /// on `items.category_id`.
    pub async fn delete(pool: &PgPool, id: CategoryId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_i32())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Walk ancestors of `candidate_parent`; fail if `self_id` (when
    /// present) is self-referenced or appears among them.
    async fn ensure_acyclic(
        pool: &PgPool,
        self_id: Option<CategoryId>,
        candidate_parent: Option<CategoryId>,
    ) -> Result<(), AppError> {
        let Some(mut current) = candidate_parent else {
            return Ok(());
        };

        if Some(current) == self_id {
            return Err(AppError::Domain(DomainError::CategoryCycle));
        }

        // The tree is small and admin-managed; bound the walk generously
        // rather than relying on a recursive CTE.
        for _ in 0..64 {
            let row: Option<(Option<i32>,)> =
                sqlx::query_as("SELECT parent_id FROM categories WHERE id = $1")
                    .bind(current.as_i32())
                    .fetch_optional(pool)
                    .await?;

            let Some((parent,)) = row else {
                return Ok(());
            };

            let Some(parent) = parent else {
                return Ok(());
            };

            let parent = CategoryId::from_i32(parent);
            if Some(parent) == self_id {
                return Err(AppError::Domain(DomainError::CategoryCycle));
            }
            current = parent;
        }

        Err(AppError::Domain(DomainError::CategoryCycle))
    }
}
