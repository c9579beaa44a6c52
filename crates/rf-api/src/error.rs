//! HTTP mapping for failures raised by the core and its adapters.
//!
//! Typed `AppError`s pick the status code; anything else is a storage or
//! infrastructure failure and is reported as a redacted 500.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use rf_core::error::AppError;
use serde_json::json;

/// Convenient result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0.downcast_ref::<AppError>() {
            Some(AppError::NotFound(..)) => StatusCode::NOT_FOUND,
            Some(AppError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            Some(AppError::Conflict(_)) => StatusCode::CONFLICT,
            Some(AppError::Internal(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            // Do not leak storage details to clients.
            tracing::error!(error = ?self.0, "request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        HttpResponse::build(status).json(json!({ "errors": [message] }))
    }
}
