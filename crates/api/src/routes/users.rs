use axum::{
    extract::{Path, State},
    Json,
};
use db::models::UpdateUser;
use db::UserRepository;
use serde::Serialize;
use shared::{types::UserId, AppError};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    routes::auth::UserResponse,
    state::AppState,
};

/// GET /users/me
pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserResponse>> {
    let user = UserRepository::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::from(AppError::Unauthorized))?;
    Ok(Json(user.into()))
}

/// PUT /users/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserRepository::update(&state.pool, auth.user_id, req)
        .await?
        .ok_or_else(|| ApiError::from(AppError::Unauthorized))?;
    Ok(Json(user.into()))
}

#[derive(Debug, Serialize)]
pub struct PublicUserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    pub rating_average: Option<String>,
    pub review_count: i32,
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PublicUserResponse>> {
    let user_id: UserId = id
        .parse()
        .map_err(|_| ApiError::from(AppError::Validation("invalid user id".to_string())))?;

    let user = UserRepository::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::from(AppError::NotFound("user not found".to_string())))?;

    Ok(Json(PublicUserResponse {
        id: user.id.to_string(),
        first_name: user.first_name,
        last_name: user.last_name,
        bio: user.bio,
        location: user.location,
        avatar: user.avatar,
        rating_average: user.rating_average.map(|r| r.to_string()),
        review_count: user.review_count,
    }))
}
