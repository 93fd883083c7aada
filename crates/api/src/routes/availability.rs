use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use db::BookingRepository;
use domain::{compute_pricing, project_availability, AvailabilityEntry};
use serde::{Deserialize, Serialize};
use shared::{types::{DateRange, ItemId}, AppError, DomainError};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityRangeResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

fn parse_item_id(id: &str) -> ApiResult<ItemId> {
    id.parse()
        .map_err(|_| ApiError::from(AppError::Validation("invalid item id".to_string())))
}

fn parse_window(query: &WindowQuery) -> ApiResult<Option<DateRange>> {
    match (query.from, query.to) {
        (Some(from), Some(to)) => {
            let range = DateRange::new(from, to)
                .map_err(|e| ApiError::from(AppError::Validation(e.to_string())))?;
            Ok(Some(range))
        }
        (None, None) => Ok(None),
        _ => Err(ApiError::from(AppError::Validation(
            "both from and to must be given, or neither".to_string(),
        ))),
    }
}

/// GET /items/:id/availability
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Vec<AvailabilityRangeResponse>>> {
    let item_id = parse_item_id(&id)?;
    let window = parse_window(&query)?;

    let bookings = BookingRepository::find_for_item(&state.pool, item_id, window).await?;

    let entries: Vec<AvailabilityEntry> = bookings
        .iter()
        .map(|b| AvailabilityEntry {
            range: DateRange::new(b.start_date, b.end_date)
                .expect("persisted booking must satisfy strict date ordering"),
            status: b.status(),
        })
        .collect();

    let projected = project_availability(&entries, window);

    Ok(Json(
        projected
            .into_iter()
            .map(|e| AvailabilityRangeResponse {
                start_date: e.range.start,
                end_date: e.range.end,
                status: e.status.as_db_str().to_string(),
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct PricePreviewQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct PricePreviewResponse {
    pub total_days: i64,
    pub base_total: String,
    pub discount_rate: String,
    pub discount_amount: String,
    pub final_total: String,
    pub deposit: String,
}

/// GET /items/:id/price-preview
pub async fn preview_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PricePreviewQuery>,
) -> ApiResult<Json<PricePreviewResponse>> {
    let item_id = parse_item_id(&id)?;

    let item = db::ItemRepository::find_by_id(&state.pool, item_id)
        .await?
        .ok_or_else(|| ApiError::from(DomainError::ItemNotFound))?;

    let range = DateRange::new(query.start_date, query.end_date)
        .map_err(|e| ApiError::from(AppError::Validation(e.to_string())))?;

    let snapshot = compute_pricing(item.price_per_day, range);

    Ok(Json(PricePreviewResponse {
        total_days: snapshot.total_days,
        base_total: snapshot.base_total.to_string(),
        discount_rate: snapshot.discount_rate.to_string(),
        discount_amount: snapshot.discount_amount.to_string(),
        final_total: snapshot.final_total.to_string(),
        deposit: item.deposit_amount.to_string(),
    }))
}
