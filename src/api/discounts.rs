//! Discount handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::discounts::NewDiscount;
use crate::domain::Discount;
use crate::error::ApiError;

use super::{AppState, PaginatedResponse, Pagination};

#[derive(Debug, Deserialize, Validate)]
pub struct DiscountPayload {
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    pub rate: u8,
    pub promo_code: Option<String>,
}

impl DiscountPayload {
    fn into_new(self) -> Result<NewDiscount, ApiError> {
        self.validate().map_err(|e| ApiError::Unprocessable(e.to_string()))?;
        Ok(NewDiscount {
            description: self.description,
            rate: self.rate,
            promo_code: self.promo_code,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<Discount>>, ApiError> {
    let (limit, offset, page) = pagination.limit_offset()?;
    let (discounts, total) = state.discounts.list(limit, offset).await?;
    Ok(Json(PaginatedResponse { data: discounts, total, page }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Discount>, ApiError> {
    Ok(Json(state.discounts.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<DiscountPayload>,
) -> Result<(StatusCode, Json<Discount>), ApiError> {
    let discount = state.discounts.create(payload.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(discount)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DiscountPayload>,
) -> Result<Json<Discount>, ApiError> {
    Ok(Json(state.discounts.update(id, payload.into_new()?).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.discounts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Discount>, ApiError> {
    Ok(Json(state.discounts.set_active(id, true).await?))
}

pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Discount>, ApiError> {
    Ok(Json(state.discounts.set_active(id, false).await?))
}

pub async fn add_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Discount>, ApiError> {
    Ok(Json(state.discounts.add_product(id, product_id).await?))
}

pub async fn remove_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Discount>, ApiError> {
    Ok(Json(state.discounts.remove_product(id, product_id).await?))
}
