use shared::types::{ItemId, UserId};
use shared::{AppError, DomainError};
use sqlx::{PgPool, QueryBuilder};

use crate::models::{CreateItem, Item, ItemFilter, ItemImage, ItemOrdering, ItemWithImages, UpdateItem};

pub struct ItemRepository;

impl ItemRepository {
    pub async fn create(pool: &PgPool, input: CreateItem) -> Result<Item, sqlx::Error> {
        let id = ItemId::new();

        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (id, owner_id, category_id, title, description, price_per_day,
                                deposit_amount, condition, location, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, true)
            RETURNING id, owner_id, category_id, title, description, price_per_day,
                      deposit_amount, condition, location, is_active, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.owner_id.as_uuid())
        .bind(input.category_id.map(|c| c.as_i32()))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price_per_day)
        .bind(input.deposit_amount)
        .bind(input.condition)
        .bind(&input.location)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: ItemId) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, owner_id, category_id, title, description, price_per_day,
                   deposit_amount, condition, location, is_active, created_at, updated_at
            FROM items WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn with_images(pool: &PgPool, item: Item) -> Result<ItemWithImages, sqlx::Error> {
        let images = sqlx::query_as::<_, ItemImage>(
            r#"
            SELECT id, item_id, url, is_cover, position
            FROM item_images WHERE item_id = $1 ORDER BY position
            "#,
        )
        .bind(item.id.as_uuid())
        .fetch_all(pool)
        .await?;

        Ok(ItemWithImages { item, images })
    }

    pub async fn search(
        pool: &PgPool,
        filter: ItemFilter,
        ordering: ItemOrdering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let mut qb = QueryBuilder::new(
            r#"
            SELECT id, owner_id, category_id, title, description, price_per_day,
                   deposit_amount, condition, location, is_active, created_at, updated_at
            FROM items WHERE 1 = 1
            "#,
        );

        if filter.active_only {
            qb.push(" AND is_active = true");
        }
        if let Some(category_id) = filter.category_id {
            qb.push(" AND category_id = ").push_bind(category_id.as_i32());
        }
        if let Some(min_price) = filter.min_price {
            qb.push(" AND price_per_day >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            qb.push(" AND price_per_day <= ").push_bind(max_price);
        }
        if let Some(location) = &filter.location {
            qb.push(" AND location ILIKE ").push_bind(format!("%{location}%"));
        }
        if let Some(text) = &filter.text {
            qb.push(" AND (title ILIKE ").push_bind(format!("%{text}%"));
            qb.push(" OR description ILIKE ").push_bind(format!("%{text}%"));
            qb.push(")");
        }

        match ordering {
            ItemOrdering::PriceAsc => qb.push(" ORDER BY price_per_day ASC"),
            ItemOrdering::PriceDesc => qb.push(" ORDER BY price_per_day DESC"),
            ItemOrdering::NewestFirst => qb.push(" ORDER BY created_at DESC"),
        };

        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        qb.build_query_as::<Item>().fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: ItemId,
        owner_id: UserId,
        input: UpdateItem,
    ) -> Result<Item, AppError> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(DomainError::ItemNotFound)?;
        if existing.owner_id != owner_id {
            return Err(AppError::Forbidden);
        }

        let category_id = match input.category_id {
            Some(inner) => inner,
            None => existing.category_id,
        };

        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                category_id = $5,
                condition = COALESCE($6, condition),
                price_per_day = COALESCE($7, price_per_day),
                deposit_amount = COALESCE($8, deposit_amount),
                location = COALESCE($9, location),
                is_active = COALESCE($10, is_active),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, category_id, title, description, price_per_day,
                      deposit_amount, condition, location, is_active, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(owner_id.as_uuid())
        .bind(&input.title)
        .bind(&input.description)
        .bind(category_id.map(|c| c.as_i32()))
        .bind(input.condition)
        .bind(input.price_per_day)
        .bind(input.deposit_amount)
        .bind(&input.location)
        .bind(input.is_active)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Items are soft-deactivated rather than removed: "delete" sets
    /// `is_active = false` and leaves the row (and any bookings that
    /// reference it) intact.
    pub async fn delete(pool: &PgPool, id: ItemId, owner_id: UserId) -> Result<bool, AppError> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(DomainError::ItemNotFound)?;
        if existing.owner_id != owner_id {
            return Err(AppError::Forbidden);
        }

        let result = sqlx::query(
            "UPDATE items SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set `url`'s image as the sole cover image for `item_id`, unsetting
    /// any previous cover in the same transaction — maintains the "at most
    /// one cover" invariant even though it is also backed by a partial
    /// unique index.
    pub async fn set_cover_image(
        pool: &PgPool,
        item_id: ItemId,
        image_id: uuid::Uuid,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE item_images SET is_cover = false WHERE item_id = $1")
            .bind(item_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE item_images SET is_cover = true WHERE id = $1 AND item_id = $2")
            .bind(image_id)
            .bind(item_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }
}
