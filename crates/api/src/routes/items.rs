use axum::{
    extract::{Path, Query, State},
    Json,
};
use db::models::{CreateItem, ItemCondition, ItemFilter, ItemOrdering, ItemWithImages, UpdateItem};
use db::ItemRepository;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{types::ItemId, AppError, DomainError};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub owner_id: String,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub price_per_day: String,
    pub deposit_amount: String,
    pub condition: ItemCondition,
    pub location: String,
    pub is_active: bool,
    pub images: Vec<ItemImageResponse>,
}

#[derive(Debug, Serialize)]
pub struct ItemImageResponse {
    pub id: String,
    pub url: String,
    pub is_cover: bool,
    pub position: i32,
}

impl From<ItemWithImages> for ItemResponse {
    fn from(w: ItemWithImages) -> Self {
        Self {
            id: w.item.id.to_string(),
            owner_id: w.item.owner_id.to_string(),
            category_id: w.item.category_id.map(|c| c.as_i32()),
            title: w.item.title,
            description: w.item.description,
            price_per_day: w.item.price_per_day.to_string(),
            deposit_amount: w.item.deposit_amount.to_string(),
            condition: w.item.condition,
            location: w.item.location,
            is_active: w.item.is_active,
            images: w
                .images
                .into_iter()
                .map(|i| ItemImageResponse {
                    id: i.id.to_string(),
                    url: i.url,
                    is_cover: i.is_cover,
                    position: i.position,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub category_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub price_per_day: Decimal,
    pub deposit_amount: Decimal,
    pub condition: ItemCondition,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchItemsQuery {
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub location: Option<String>,
    pub text: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

fn parse_ordering(order: Option<&str>) -> ItemOrdering {
    match order {
        Some("price_asc") => ItemOrdering::PriceAsc,
        Some("price_desc") => ItemOrdering::PriceDesc,
        _ => ItemOrdering::NewestFirst,
    }
}

/// GET /items
pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchItemsQuery>,
) -> ApiResult<Json<Vec<ItemResponse>>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);

    let filter = ItemFilter {
        category_id: query.category_id.map(shared::types::CategoryId::from_i32),
        min_price: query.min_price,
        max_price: query.max_price,
        location: query.location,
        text: query.text,
        active_only: true,
    };

    let items = ItemRepository::search(
        &state.pool,
        filter,
        parse_ordering(query.order.as_deref()),
        page_size,
        (page - 1) * page_size,
    )
    .await?;

    let mut responses = Vec::with_capacity(items.len());
    for item in items {
        let with_images = ItemRepository::with_images(&state.pool, item).await?;
        responses.push(with_images.into());
    }

    Ok(Json(responses))
}

fn parse_item_id(id: &str) -> ApiResult<ItemId> {
    id.parse()
        .map_err(|_| ApiError::from(AppError::Validation("invalid item id".to_string())))
}

/// GET /items/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemResponse>> {
    let id = parse_item_id(&id)?;
    let item = ItemRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::from(DomainError::ItemNotFound))?;
    let with_images = ItemRepository::with_images(&state.pool, item).await?;
    Ok(Json(with_images.into()))
}

/// POST /items
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateItemRequest>,
) -> ApiResult<Json<ItemResponse>> {
    if req.title.trim().is_empty() {
        return Err(ApiError::from(AppError::Validation("title is required".to_string())));
    }
    if req.price_per_day.is_sign_negative() || req.deposit_amount.is_sign_negative() {
        return Err(ApiError::from(AppError::Validation(
            "price and deposit must be non-negative".to_string(),
        )));
    }

    let item = ItemRepository::create(
        &state.pool,
        CreateItem {
            owner_id: auth.user_id,
            category_id: req.category_id.map(shared::types::CategoryId::from_i32),
            title: req.title,
            description: req.description,
            price_per_day: req.price_per_day,
            deposit_amount: req.deposit_amount,
            condition: req.condition,
            location: req.location,
        },
    )
    .await?;

    let with_images = ItemRepository::with_images(&state.pool, item).await?;
    Ok(Json(with_images.into()))
}

/// PUT /items/:id
pub async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateItem>,
) -> ApiResult<Json<ItemResponse>> {
    let id = parse_item_id(&id)?;
    let item = ItemRepository::update(&state.pool, id, auth.user_id, req).await?;
    let with_images = ItemRepository::with_images(&state.pool, item).await?;
    Ok(Json(with_images.into()))
}

/// DELETE /items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_item_id(&id)?;
    ItemRepository::delete(&state.pool, id, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
