//! Category handlers. Subcategories are child categories via `parent`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::Category;
use crate::error::ApiError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub parent: Option<Uuid>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.categories.list(params.parent).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, ApiError> {
    state
        .categories
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("category not found".to_string()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    payload.validate().map_err(|e| ApiError::Unprocessable(e.to_string()))?;
    if let Some(parent_id) = payload.parent_id {
        state
            .categories
            .find(parent_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("parent category not found".to_string()))?;
    }
    let category = Category::create(payload.name, payload.description, payload.parent_id);
    state.categories.insert(&category).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, ApiError> {
    payload.validate().map_err(|e| ApiError::Unprocessable(e.to_string()))?;
    let mut category = state
        .categories
        .find(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("category not found".to_string()))?;
    category.update(payload.name, payload.description, payload.parent_id);
    if !state.categories.update(&category).await? {
        return Err(ApiError::NotFound("category not found".to_string()));
    }
    Ok(Json(category))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let in_category = state.products.count_in_category(id).await?;
    if in_category > 0 {
        return Err(ApiError::Conflict(format!(
            "category still has {in_category} products"
        )));
    }
    if !state.categories.delete(id).await? {
        return Err(ApiError::NotFound("category not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
