//! Centralized error translation for the HTTP surface.
//!
//! Every failure renders as the uniform
//! `{ "error": true, "status": N, "message": "..." }` payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domain::cart::CartError;
use crate::domain::discount::DiscountError;
use crate::domain::product::ProductError;
use crate::domain::sale::SaleError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request shape: missing or extra fields, bad pagination.
    #[error("{0}")]
    Validation(String),
    /// Payload failed schema validation.
    #[error("{0}")]
    Unprocessable(String),
    /// Checkout was attempted with no resolvable, non-empty cart.
    #[error("no active cart to check out")]
    NoActiveCart,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) | Self::NoActiveCart => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::OutOfStock(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };
        let body = Json(json!({
            "error": true,
            "status": status.as_u16(),
            "message": message,
        }));
        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            StoreError::VersionConflict => {
                Self::Conflict("cart was modified concurrently, retry".to_string())
            }
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::OutOfStock { product } => Self::OutOfStock(product),
            StoreError::Duplicate(message) => Self::Validation(format!("duplicate value: {message}")),
            StoreError::Invalid(message) => Self::Validation(message),
            StoreError::Decode(message) => {
                Self::Internal(anyhow::anyhow!("stored document corrupt: {message}"))
            }
            StoreError::Database(e) => Self::Internal(e.into()),
        }
    }
}

impl From<CartError> for ApiError {
    fn from(_: CartError) -> Self {
        Self::NotFound("product not in cart".to_string())
    }
}

impl From<SaleError> for ApiError {
    fn from(e: SaleError) -> Self {
        Self::Conflict(e.to_string())
    }
}

impl From<ProductError> for ApiError {
    fn from(e: ProductError) -> Self {
        Self::Conflict(e.to_string())
    }
}

impl From<DiscountError> for ApiError {
    fn from(e: DiscountError) -> Self {
        match e {
            DiscountError::NoProducts => Self::Validation(e.to_string()),
            DiscountError::ProductNotListed => Self::NotFound(e.to_string()),
            DiscountError::ActiveIsFrozen
            | DiscountError::AlreadyActive
            | DiscountError::AlreadyInactive
            | DiscountError::ProductAlreadyListed => Self::Conflict(e.to_string()),
        }
    }
}
