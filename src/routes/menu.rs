//! Menu CRUD handlers
//!
//! Reads are public; create, update, and delete sit behind the auth
//! middleware but carry no ownership check.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;
use crate::pagination::{PageQuery, Paginated};

const MENU_NOT_FOUND: &str = "Menu not found.";

/// Create a menu item
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("Expected a JSON object".to_string()))?;

    let item = state.menu_repository.create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Paginated menu listing, unauthenticated
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state.menu_repository.list(&query).await?;
    Ok(Json(Paginated::new(items, &query, total)))
}

/// Fetch a single menu item by id, unauthenticated
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .menu_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(MENU_NOT_FOUND.to_string()))?;

    Ok(Json(item))
}

/// Partially update a menu item
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("Expected a JSON object".to_string()))?;

    let item = state.menu_repository.update(id, payload).await?;
    Ok(Json(item))
}

/// Delete a menu item
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.menu_repository.delete(id).await?;
    Ok(Json(serde_json::json!({"message": "Menu deleted successfully"})))
}
