//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Every body has the shape `{"error": "<message>"}`; database failures
//! carry a per-route public message while the underlying error is logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str },

    /// Database error (500, logged with a route-specific public message)
    Database {
        public: &'static str,
        source: DbError,
    },
}

impl ApiError {
    /// Wrap a repository error, keeping row-not-found as a 404 and
    /// attaching `public` as the client-facing message for everything else.
    pub fn db(err: DbError, public: &'static str) -> Self {
        match err {
            DbError::NotFound { resource, .. } => Self::NotFound { resource },
            source => Self::Database { public, source },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::NotFound { resource } => {
                (StatusCode::NOT_FOUND, format!("{} not found", resource))
            }
            Self::Database { public, source } => {
                // Log the actual error, return the route's generic message
                tracing::error!("Database error: {}", source);
                (StatusCode::INTERNAL_SERVER_ERROR, (*public).to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
