//! Sale handlers: checkout plus the admin surface.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::checkout::NewSale;
use crate::domain::{CustomerInfo, PaymentMethod, Sale, SaleStatus};
use crate::error::ApiError;

use super::{AppState, MaybeOwner, PaginatedResponse, Pagination};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSaleBody {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    pub customer_phone: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    pub payment_method: PaymentMethod,
}

pub async fn create(
    State(state): State<AppState>,
    MaybeOwner(owner): MaybeOwner,
    Json(body): Json<CreateSaleBody>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    body.validate().map_err(|e| ApiError::Unprocessable(e.to_string()))?;
    let new_sale = NewSale {
        customer: CustomerInfo {
            name: body.customer_name,
            email: body.customer_email,
            phone: body.customer_phone,
            address: body.address,
        },
        payment_method: body.payment_method,
    };
    let sale = state.checkout.create_sale(owner.as_ref(), new_sale).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<Sale>>, ApiError> {
    let (limit, offset, page) = pagination.limit_offset()?;
    let (sales, total) = state.checkout.list_sales(limit, offset).await?;
    Ok(Json(PaginatedResponse { data: sales, total, page }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Sale>, ApiError> {
    Ok(Json(state.checkout.get_sale(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Sale>, ApiError> {
    let status = body
        .status
        .parse::<SaleStatus>()
        .map_err(|_| ApiError::Validation(format!("unknown sale status `{}`", body.status)))?;
    Ok(Json(state.checkout.update_status(id, status).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.checkout.delete_sale(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
