//! Error types for the HTTP surface.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Body sent with every unexpected fault. Details stay in the logs.
pub const INTERNAL_ERROR_BODY: &str = "internal server error";

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Input rejected by validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Malformed request that never reached validation.
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Database(DatabaseError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Database(err @ DatabaseError::MissingParent { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Database(err @ DatabaseError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Database(err) => {
                tracing::error!(error = %err, detail = ?err, "Request failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation(ValidationError::Missing("nome".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Database(DatabaseError::NotFound {
                    entity: "Person",
                    id: "7".to_string(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Database(DatabaseError::MissingParent {
                    entity: "Person",
                    id: "7".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Database(DatabaseError::AlreadyExists {
                    entity: "Person",
                    id: "ana@x.com".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::BadRequest("bad json".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
