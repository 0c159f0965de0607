//! Reservation CRUD handlers
//!
//! All endpoints require authentication and are scoped to the caller: the
//! middleware inserts an `AuthUser` extension, and the repository filters
//! every query by that owner.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::pagination::{PageQuery, Paginated};

/// Create a reservation owned by the caller
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("Expected a JSON object".to_string()))?;

    let reservation = state
        .reservation_repository
        .create(user.id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Paginated listing of the caller's reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (reservations, total) = state
        .reservation_repository
        .list_by_user(user.id, &query)
        .await?;

    Ok(Json(Paginated::new(reservations, &query, total)))
}

/// Fetch one of the caller's reservations by id
pub async fn get_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = state.reservation_repository.find_by_id(id, user.id).await?;
    Ok(Json(reservation))
}

/// Partially update one of the caller's reservations
pub async fn update_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("Expected a JSON object".to_string()))?;

    let reservation = state
        .reservation_repository
        .update(id, user.id, payload)
        .await?;

    Ok(Json(reservation))
}

/// Delete one of the caller's reservations
pub async fn delete_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.reservation_repository.delete(id, user.id).await?;
    Ok(Json(serde_json::json!({"message": "Reservation deleted successfully."})))
}
