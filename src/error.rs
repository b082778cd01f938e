//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type of the service. Each variant
//! maps to an HTTP status code and the JSON error envelope. Store
//! failures are logged here and reported to the caller with a generic
//! message so database internals never leak.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error envelope.
///
/// ```json
/// {
///   "success": false,
///   "error": "jewelry item not found: abcdEFGH",
///   "code": 2001
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Numeric error code (see [`ApiError::error_code`]).
    pub code: u32,
    /// Field-level validation details, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Failure inside the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key already exists.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// Query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored document could not be encoded or decoded.
    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 / 422                    |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed body, query string, or filter value.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Input parsed but failed field validation.
    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),

    /// No item with the given `item_id`.
    #[error("jewelry item not found: {0}")]
    ItemNotFound(String),

    /// No route matches the request path.
    #[error("no route for {0}")]
    RouteNotFound(String),

    /// Requested status change violates the forward-only lifecycle.
    #[error("cannot change status from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: crate::domain::ItemStatus,
        /// Requested status.
        to: crate::domain::ItemStatus,
    },

    /// Unique constraint violation in the store.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store failure.
    #[error("store error: {0}")]
    Store(StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(key) => Self::Conflict(key),
            other => Self::Store(other),
        }
    }
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Validation(_) => 1002,
            Self::ItemNotFound(_) => 2001,
            Self::RouteNotFound(_) => 2004,
            Self::InvalidStatusTransition { .. } => 2002,
            Self::Conflict(_) => 2003,
            Self::Store(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ItemNotFound(_) | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidStatusTransition { .. } | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the envelope sent to the client.
    #[must_use]
    pub fn to_response_body(&self) -> ErrorResponse {
        let (error, details) = match self {
            Self::Validation(errors) => (
                self.to_string(),
                serde_json::to_value(errors).ok(),
            ),
            Self::Store(_) | Self::Internal(_) => ("internal server error".to_string(), None),
            _ => (self.to_string(), None),
        };
        ErrorResponse {
            success: false,
            error,
            code: self.error_code(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let mut response = axum::Json(self.to_response_body()).into_response();
        *response.status_mut() = status;
        response
    }
}
