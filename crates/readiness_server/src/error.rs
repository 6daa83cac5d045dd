//! Request errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures surfaced to HTTP callers.
///
/// A component that exists but is not ready is not an error; the `/ready`
/// handler answers it with 503 directly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Missing 'component' query parameter")]
    MissingComponent,

    #[error("Missing 'component' or 'value' query parameter")]
    MissingComponentOrValue,

    #[error("Component '{0}' not found")]
    UnknownComponent(String),

    #[error("Invalid 'value' query parameter: {0}")]
    InvalidValue(#[from] readiness_registry::ReadinessError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingComponent
            | ApiError::MissingComponentOrValue
            | ApiError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownComponent(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Result type alias for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;
