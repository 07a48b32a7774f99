//! Custom error types for the API service
//!
//! Expected business-rule failures (not found, forbidden, validation,
//! conflict) are structured outcomes with a human-readable message and map
//! to 4xx responses. Store faults are logged with context and surface as a
//! generic 500 without internal detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// The id has no corresponding live entity
    #[error("{0}")]
    NotFound(String),

    /// The actor is not authorized for this specific action
    #[error("{0}")]
    Forbidden(String),

    /// Input violates length/shape/presence constraints
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation, e.g. a duplicate vote race or duplicate username
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    /// Map a sqlx error to `Conflict` when it is a unique-constraint
    /// violation, otherwise pass it through as a database fault.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        let is_unique_violation = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code == "23505")
            .unwrap_or(false);

        if is_unique_violation {
            ApiError::Conflict(message.to_string())
        } else {
            ApiError::Database(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiError::InternalServerError => {
                tracing::error!("Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
