//! Error types and handling
//!
//! Every failure surfaces as an [`AppError`]. Handlers return it directly and it
//! renders as a consistent JSON body, so no error is fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed booking input (422); raised before any storage write
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced business, service, appointment or profile is absent (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend storage call failed (500)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Notification endpoint failed or answered `success: false` (502)
    #[error("Notification error: {0}")]
    Notification(String),

    /// Bad request - unparseable input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized - authentication required (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden - insufficient role (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflict - e.g. an owner creating a second business (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        AppError::Storage(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Machine-readable error type used in response bodies
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Storage(_) => "storage_error",
            AppError::Notification(_) => "notification_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, should_log) = match &self {
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, false),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, false),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, true),
            AppError::Notification(_) => (StatusCode::BAD_GATEWAY, true),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, false),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, false),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, true),
            AppError::Conflict(_) => (StatusCode::CONFLICT, false),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, true),
        };

        let error_type = self.error_type();

        // Log server errors
        if should_log {
            error!(error = %self, error_type = error_type, "Request error");
        }

        let body = ErrorResponse::new(error_type, self.to_string());

        (status, Json(body)).into_response()
    }
}

// Implement From for common error types

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            _ => AppError::Storage(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Notification("Notification endpoint timed out".to_string())
        } else if err.is_connect() {
            AppError::Notification("Failed to connect to notification endpoint".to_string())
        } else {
            AppError::Notification(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
