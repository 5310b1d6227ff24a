//! Maps core and auth errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fintrack_core::errors::{DatabaseError, Error, ValidationError};
use serde_json::json;

use crate::auth::AuthError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Core(Error),
    Auth(AuthError),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Core(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Auth(err) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": err.to_string() }),
            ),
            ApiError::Core(Error::Validation(ValidationError::Fields(issues))) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation failed", "fields": issues }),
            ),
            ApiError::Core(Error::Validation(err)) => {
                (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
            }
            ApiError::Core(Error::Database(DatabaseError::NotFound(_))) => {
                (StatusCode::NOT_FOUND, json!({ "error": "not found" }))
            }
            // A lost race on a unique index is a conflict, not a server
            // fault.
            ApiError::Core(Error::Database(DatabaseError::UniqueViolation(msg))) => {
                (StatusCode::CONFLICT, json!({ "error": msg }))
            }
            ApiError::Core(err) => {
                tracing::error!("Internal error handling request: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
