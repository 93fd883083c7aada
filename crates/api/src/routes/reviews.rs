use axum::{extract::State, Json};
use db::models::{CreateReview, ReviewDirection};
use db::ReviewRepository;
use serde::{Deserialize, Serialize};
use shared::AppError;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub booking_id: String,
    pub rating: i16,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub booking_id: String,
    pub reviewer_id: String,
    pub reviewed_user_id: String,
    pub direction: ReviewDirection,
    pub rating: i16,
    pub comment: String,
}

impl From<db::models::Review> for ReviewResponse {
    fn from(r: db::models::Review) -> Self {
        Self {
            id: r.id.to_string(),
            booking_id: r.booking_id.to_string(),
            reviewer_id: r.reviewer_id.to_string(),
            reviewed_user_id: r.reviewed_user_id.to_string(),
            direction: r.direction,
            rating: r.rating,
            comment: r.comment,
        }
    }
}

/// POST /reviews
pub async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateReviewRequest>,
) -> ApiResult<Json<ReviewResponse>> {
    let booking_id = req
        .booking_id
        .parse()
        .map_err(|_| ApiError::from(AppError::Validation("invalid booking id".to_string())))?;

    let review = ReviewRepository::create(
        &state.pool,
        CreateReview {
            booking_id,
            reviewer_id: auth.user_id,
            rating: req.rating,
            comment: req.comment,
        },
    )
    .await?;

    crate::metrics::record_review_created();

    Ok(Json(review.into()))
}
