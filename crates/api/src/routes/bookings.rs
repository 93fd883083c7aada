use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use db::models::CreateBooking;
use db::BookingRepository;
use domain::BookingStatus;
use serde::{Deserialize, Serialize};
use shared::{types::BookingId, AppError, DomainError};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub item_id: String,
    pub renter_id: String,
    pub owner_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub total_days: i32,
    pub base_total: String,
    pub discount_rate: String,
    pub discount_amount: String,
    pub final_total: String,
    pub deposit: String,
}

impl From<db::models::Booking> for BookingResponse {
    fn from(b: db::models::Booking) -> Self {
        Self {
            id: b.id.to_string(),
            item_id: b.item_id.to_string(),
            renter_id: b.renter_id.to_string(),
            owner_id: b.owner_id.to_string(),
            start_date: b.start_date,
            end_date: b.end_date,
            status: b.status.clone(),
            total_days: b.total_days,
            base_total: b.base_total.to_string(),
            discount_rate: b.discount_rate.to_string(),
            discount_amount: b.discount_amount.to_string(),
            final_total: b.final_total.to_string(),
            deposit: b.deposit.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub item_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// POST /bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let item_id = req
        .item_id
        .parse()
        .map_err(|_| ApiError::from(AppError::Validation("invalid item id".to_string())))?;

    let timer = crate::metrics::BookingCreationTimer::start();
    let result = BookingRepository::create(
        &state.pool,
        state.clock.as_ref(),
        CreateBooking {
            item_id,
            renter_id: auth.user_id,
            start_date: req.start_date,
            end_date: req.end_date,
        },
    )
    .await;
    timer.record();

    let booking = match result {
        Ok(booking) => {
            crate::metrics::record_booking_created();
            booking
        }
        Err(e @ AppError::Domain(DomainError::BookingOverlap)) => {
            crate::metrics::record_booking_overlap();
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(booking.into()))
}

fn parse_booking_id(id: &str) -> ApiResult<BookingId> {
    id.parse()
        .map_err(|_| ApiError::from(AppError::Validation("invalid booking id".to_string())))
}

/// GET /bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingResponse>> {
    let booking_id = parse_booking_id(&id)?;
    let booking = BookingRepository::find_by_id(&state.pool, booking_id)
        .await?
        .ok_or_else(|| ApiError::from(DomainError::BookingNotFound))?;

    if booking.renter_id != auth.user_id && booking.owner_id != auth.user_id {
        return Err(ApiError::from(AppError::Forbidden));
    }

    Ok(Json(booking.into()))
}

#[derive(Debug, Deserialize)]
pub struct TransitionBookingRequest {
    pub action: String,
}

fn target_status(action: &str) -> ApiResult<BookingStatus> {
    match action {
        "approve" => Ok(BookingStatus::Approved),
        "reject" => Ok(BookingStatus::Rejected),
        "cancel" => Ok(BookingStatus::Cancelled),
        "mark_payment_pending" => Ok(BookingStatus::PaymentPending),
        "complete" => Ok(BookingStatus::Completed),
        other => Err(ApiError::from(AppError::Validation(format!(
            "unrecognized action: {other}"
        )))),
    }
}

/// POST /bookings/:id/transition
pub async fn transition_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<TransitionBookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let booking_id = parse_booking_id(&id)?;
    let to = target_status(&req.action)?;

    let booking = BookingRepository::transition(
        &state.pool,
        state.clock.as_ref(),
        booking_id,
        auth.user_id,
        to,
    )
    .await?;

    crate::metrics::record_transition(to.as_db_str());

    Ok(Json(booking.into()))
}

#[derive(Debug, Deserialize)]
pub struct ListMyBookingsQuery {
    pub role: Option<String>,
}

/// GET /bookings/mine
pub async fn list_my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListMyBookingsQuery>,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let (as_renter, as_owner) = match query.role.as_deref() {
        Some("renter") => (true, false),
        Some("owner") => (false, true),
        Some("both") | None => (true, true),
        Some(other) => {
            return Err(ApiError::from(AppError::Validation(format!(
                "unrecognized role: {other}"
            ))))
        }
    };

    let bookings =
        BookingRepository::list_for_user(&state.pool, auth.user_id, as_renter, as_owner).await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
