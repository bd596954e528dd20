//! Cart handlers.
//!
//! Member responses mirror the cart into a `cart` cookie so the storefront
//! can render without a follow-up read.

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::cart::CartUpdate;
use crate::domain::{Cart, CartOwner};
use crate::error::ApiError;

use super::{AppState, Owner};

pub async fn get_cart(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Response, ApiError> {
    let cart = state.engine.get_cart(&owner).await?;
    let message = if cart.is_empty() { "cart is empty" } else { "cart refreshed" };
    Ok(cart_response(StatusCode::OK, message, &cart, &owner, state.cart_cookie_max_age))
}

#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub quantity: Option<i64>,
}

pub async fn add_item(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(product_id): Path<Uuid>,
    body: Option<Json<AddItemBody>>,
) -> Result<Response, ApiError> {
    // an absent or unparsable quantity defaults to one
    let quantity = body.and_then(|Json(b)| b.quantity).unwrap_or(1);
    let cart = state.engine.add_item(&owner, product_id, quantity).await?;
    Ok(cart_response(StatusCode::CREATED, "item added to cart", &cart, &owner, state.cart_cookie_max_age))
}

pub async fn update_cart(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(update): Json<CartUpdate>,
) -> Result<Response, ApiError> {
    let cart = state.engine.update_cart(&owner, update).await?;
    Ok(cart_response(StatusCode::OK, "cart updated", &cart, &owner, state.cart_cookie_max_age))
}

pub async fn merge(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Response, ApiError> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<Uuid>().ok())
        .ok_or_else(|| {
            ApiError::Unprocessable("merge requires an authenticated x-user-id".to_string())
        })?;
    let session = headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::Unprocessable("merge requires the guest x-session-id".to_string())
        })?;
    let cart = state.engine.merge_carts(session, user_id).await?;
    let owner = CartOwner::Member(user_id);
    Ok(cart_response(StatusCode::OK, "carts merged", &cart, &owner, state.cart_cookie_max_age))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PromoBody {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
}

pub async fn apply_promo(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(body): Json<PromoBody>,
) -> Result<Response, ApiError> {
    body.validate().map_err(|e| ApiError::Unprocessable(e.to_string()))?;
    let cart = state.engine.apply_promo_code(&owner, &body.code).await?;
    Ok(cart_response(StatusCode::OK, "promo code applied", &cart, &owner, state.cart_cookie_max_age))
}

fn cart_response(
    status: StatusCode,
    message: &str,
    cart: &Cart,
    owner: &CartOwner,
    cookie_max_age: u64,
) -> Response {
    let body = Json(json!({
        "message": message,
        "cart": cart.items(),
        "total": cart.total(),
    }));
    let mut response = (status, body).into_response();
    if owner.is_member() {
        if let Some(cookie) = cart_cookie(cart, cookie_max_age) {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }
    response
}

fn cart_cookie(cart: &Cart, max_age: u64) -> Option<HeaderValue> {
    let payload = serde_json::to_vec(cart).ok()?;
    let encoded = BASE64.encode(payload);
    HeaderValue::from_str(&format!("cart={encoded}; Max-Age={max_age}; Path=/")).ok()
}
