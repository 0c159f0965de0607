//! API error types and their HTTP mapping
//!
//! Validation failures carry the full list of accumulated reasons and render
//! as `{"errors": [..]}`. Everything else renders as a single
//! `{"error": ".."}` message. Ownership is never leaked: a row owned by
//! another user surfaces as `NotFound`, indistinguishable from an absent row.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type shared by all handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Failed login; deliberately identical for unknown usernames and
    /// wrong passwords
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Malformed request with a single message
    #[error("{0}")]
    BadRequest(String),

    /// Missing row, or a row owned by someone else
    #[error("{0}")]
    NotFound(String),

    /// Accumulated validation reasons
    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Unauthorized"}),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Invalid credentials"}),
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({"error": message})),
            ApiError::Validation(reasons) => (StatusCode::BAD_REQUEST, json!({"errors": reasons})),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Internal server error"}),
            ),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_renders_reason_list() {
        let (status, body) = body_json(ApiError::Validation(vec![
            "room_number is required.".to_string(),
            "check_in_date is required.".to_string(),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_credentials_and_unauthorized_are_both_401() {
        let (status, body) = body_json(ApiError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");

        let (status, _) = body_json(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn not_found_renders_message() {
        let (status, body) =
            body_json(ApiError::NotFound("Reservation with id 9 not found.".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Reservation with id 9 not found.");
    }

    #[tokio::test]
    async fn database_errors_hide_details() {
        let (status, body) = body_json(ApiError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
