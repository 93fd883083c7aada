use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::types::{CategoryId, ItemId, UserId};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_condition", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemCondition {
    New,
    Excellent,
    Good,
    Fair,
}

/// Item database model. `images` is loaded separately by
/// [`crate::repositories::ItemRepository`] and attached to form
/// [`ItemWithImages`] — `sqlx::FromRow` has no native support for a
/// one-to-many collection on a single row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub owner_id: UserId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_day: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_amount: Decimal,
    pub condition: ItemCondition,
    pub location: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ItemImage {
    pub id: uuid::Uuid,
    pub item_id: ItemId,
    pub url: String,
    pub is_cover: bool,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemWithImages {
    #[serde(flatten)]
    pub item: Item,
    pub images: Vec<ItemImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub owner_id: UserId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub description: String,
    pub price_per_day: Decimal,
    pub deposit_amount: Decimal,
    pub condition: ItemCondition,
    pub location: String,
}

/// Sparse field-by-field update. Recognized keys only:
/// `title, description, category, condition, pricePerDay, depositAmount,
/// location, isActive`; unknown keys are rejected rather than silently
/// ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UpdateItem {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "category")]
    pub category_id: Option<Option<CategoryId>>,
    pub condition: Option<ItemCondition>,
    pub price_per_day: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category_id: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub location: Option<String>,
    pub text: Option<String>,
    pub active_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrdering {
    PriceAsc,
    PriceDesc,
    NewestFirst,
}
