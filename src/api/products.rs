//! Product catalog handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Money, Product};
use crate::error::ApiError;
use crate::store::ProductFilter;

use super::{AppState, PaginatedResponse};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<Uuid>,
    /// Admin listings may include hidden products.
    #[serde(default)]
    pub include_hidden: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedResponse<Product>>, ApiError> {
    let pagination = super::Pagination { page: params.page, per_page: params.per_page };
    let (limit, offset, page) = pagination.limit_offset()?;
    let filter = ProductFilter { include_hidden: params.include_hidden, category: params.category };
    let (products, total) = state.products.list(&filter, limit, offset).await?;
    Ok(Json(PaginatedResponse { data: products, total, page }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    state
        .products
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("product not found".to_string()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: Option<u32>,
    pub category_id: Option<Uuid>,
    pub visible: Option<bool>,
}

impl ProductPayload {
    fn check(&self) -> Result<(), ApiError> {
        self.validate().map_err(|e| ApiError::Unprocessable(e.to_string()))?;
        if self.price < Decimal::ZERO {
            return Err(ApiError::Validation("price must not be negative".to_string()));
        }
        Ok(())
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    payload.check()?;
    if let Some(category_id) = payload.category_id {
        state
            .categories
            .find(category_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("category not found".to_string()))?;
    }
    let mut product = Product::create(
        payload.name,
        payload.description,
        Money::new(payload.price, &state.currency),
        payload.stock_quantity.unwrap_or(0),
        payload.category_id,
    );
    if let Some(visible) = payload.visible {
        product.set_visible(visible);
    }
    state.products.insert(&product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    payload.check()?;
    let mut product = state
        .products
        .find(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_string()))?;
    if let Some(category_id) = payload.category_id {
        state
            .categories
            .find(category_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("category not found".to_string()))?;
    }
    product.update_details(
        payload.name,
        payload.description,
        Money::new(payload.price, &state.currency),
        payload.category_id,
    )?;
    if let Some(visible) = payload.visible {
        product.set_visible(visible);
    }
    if !state.products.update(&product).await? {
        return Err(ApiError::NotFound("product not found".to_string()));
    }
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct RestockBody {
    pub quantity: i64,
}

pub async fn restock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RestockBody>,
) -> Result<Json<Product>, ApiError> {
    if body.quantity <= 0 {
        return Err(ApiError::Validation("quantity must be greater than zero".to_string()));
    }
    let quantity = u32::try_from(body.quantity)
        .map_err(|_| ApiError::Validation("quantity too large".to_string()))?;
    state
        .products
        .restock(id, quantity)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("product not found".to_string()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    // cart lines referencing the product are dropped by the next
    // re-pricing pass
    if !state.products.delete(id).await? {
        return Err(ApiError::NotFound("product not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
