use axum::{
    extract::{Path, State},
    Json,
};
use db::models::CreateCategory;
use db::CategoryRepository;
use serde::{Deserialize, Serialize};
use shared::{types::CategoryId, AppError, DomainError};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub parent_id: Option<i32>,
    pub icon: Option<String>,
}

impl From<db::models::Category> for CategoryResponse {
    fn from(c: db::models::Category) -> Self {
        Self {
            id: c.id.as_i32(),
            slug: c.slug,
            name: c.name,
            parent_id: c.parent_id.map(|p| p.as_i32()),
            icon: c.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub slug: String,
    pub name: String,
    pub parent_id: Option<i32>,
    pub icon: Option<String>,
}

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryResponse>>> {
    let categories = CategoryRepository::list_all(&state.pool).await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// GET /categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = CategoryRepository::find_by_id(&state.pool, CategoryId::from_i32(id))
        .await?
        .ok_or_else(|| ApiError::from(DomainError::CategoryNotFound))?;
    Ok(Json(category.into()))
}

/// POST /categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    if req.slug.trim().is_empty() || req.name.trim().is_empty() {
        return Err(ApiError::from(AppError::Validation(
            "slug and name are required".to_string(),
        )));
    }

    let category = CategoryRepository::create(
        &state.pool,
        CreateCategory {
            slug: req.slug,
            name: req.name,
            parent_id: req.parent_id.map(CategoryId::from_i32),
            icon: req.icon,
        },
    )
    .await?;

    Ok(Json(category.into()))
}

/// DELETE /categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = CategoryRepository::delete(&state.pool, CategoryId::from_i32(id)).await?;
    if !deleted {
        return Err(ApiError::from(DomainError::CategoryNotFound));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
