//! HTTP surface: router, shared state and extractors.
//!
//! Identity is an external collaborator; handlers trust the forwarded
//! `x-user-id` / `x-session-id` headers to resolve a cart owner.

pub mod cart;
pub mod categories;
pub mod discounts;
pub mod products;
pub mod sales;

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::cart::CartEngine;
use crate::checkout::CheckoutService;
use crate::discounts::DiscountService;
use crate::domain::CartOwner;
use crate::error::ApiError;
use crate::store::{CategoryStore, ProductStore};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub engine: CartEngine,
    pub checkout: CheckoutService,
    pub discounts: DiscountService,
    pub currency: String,
    pub cart_cookie_max_age: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/products", get(products::list).post(products::create))
        .route(
            "/api/v1/products/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
        .route("/api/v1/products/:id/restock", post(products::restock))
        .route("/api/v1/categories", get(categories::list).post(categories::create))
        .route(
            "/api/v1/categories/:id",
            get(categories::get).put(categories::update).delete(categories::delete),
        )
        .route("/api/v1/cart", get(cart::get_cart).patch(cart::update_cart))
        .route("/api/v1/cart/items/:product_id", post(cart::add_item))
        .route("/api/v1/cart/merge", post(cart::merge))
        .route("/api/v1/cart/promo", post(cart::apply_promo))
        .route("/api/v1/sales", get(sales::list).post(sales::create))
        .route("/api/v1/sales/:id", get(sales::get).delete(sales::delete))
        .route("/api/v1/sales/:id/status", patch(sales::update_status))
        .route("/api/v1/discounts", get(discounts::list).post(discounts::create))
        .route(
            "/api/v1/discounts/:id",
            get(discounts::get).put(discounts::update).delete(discounts::delete),
        )
        .route("/api/v1/discounts/:id/activate", post(discounts::activate))
        .route("/api/v1/discounts/:id/deactivate", post(discounts::deactivate))
        .route(
            "/api/v1/discounts/:id/products/:product_id",
            post(discounts::add_product).delete(discounts::remove_product),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "healthy", "service": "cartwright"}))
}

/// Cart owner resolved from forwarded identity headers, member first.
pub struct MaybeOwner(pub Option<CartOwner>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeOwner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(raw) = parts.headers.get("x-user-id") {
            let user_id = raw
                .to_str()
                .ok()
                .and_then(|s| s.parse::<Uuid>().ok())
                .ok_or_else(|| ApiError::Validation("invalid x-user-id header".to_string()))?;
            return Ok(Self(Some(CartOwner::Member(user_id))));
        }
        if let Some(raw) = parts.headers.get("x-session-id") {
            let session = raw
                .to_str()
                .map_err(|_| ApiError::Validation("invalid x-session-id header".to_string()))?;
            return Ok(Self(Some(CartOwner::Guest(session.to_string()))));
        }
        Ok(Self(None))
    }
}

/// Like [`MaybeOwner`], but a missing owner is an unexpected state.
pub struct Owner(pub CartOwner);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        MaybeOwner::from_request_parts(parts, state)
            .await?
            .0
            .map(Self)
            .ok_or_else(|| {
                ApiError::Unprocessable(
                    "no cart owner: supply x-user-id or x-session-id".to_string(),
                )
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Pagination {
    /// Resolve to `(page, per_page)`, rejecting out-of-range values.
    pub fn resolve(&self) -> Result<(u32, u32), ApiError> {
        let page = self.page.unwrap_or(1);
        let per_page = self.per_page.unwrap_or(20);
        if page < 1 {
            return Err(ApiError::Validation("page must be at least 1".to_string()));
        }
        if !(1..=100).contains(&per_page) {
            return Err(ApiError::Validation("per_page must be between 1 and 100".to_string()));
        }
        Ok((page, per_page))
    }

    pub fn limit_offset(&self) -> Result<(i64, i64, u32), ApiError> {
        let (page, per_page) = self.resolve()?;
        Ok((per_page as i64, ((page - 1) * per_page) as i64, page))
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        let p = Pagination { page: None, per_page: None };
        assert_eq!(p.resolve().unwrap(), (1, 20));

        let p = Pagination { page: Some(0), per_page: None };
        assert!(p.resolve().is_err());

        let p = Pagination { page: Some(2), per_page: Some(101) };
        assert!(p.resolve().is_err());

        let p = Pagination { page: Some(3), per_page: Some(10) };
        assert_eq!(p.limit_offset().unwrap(), (10, 20, 3));
    }
}
