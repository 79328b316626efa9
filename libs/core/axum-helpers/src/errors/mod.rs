pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use heck::ToLowerCamelCase;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body returned for every error response.
///
/// ```json
/// {
///   "message": "Validation error",
///   "details": { "title": ["title must not be blank"] },
///   "status": 400,
///   "timestamp": "2025-01-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short, kind-level summary
    pub message: String,
    /// Field → messages map for request validation, otherwise a plain string
    #[schema(value_type = Object)]
    pub details: Value,
    /// HTTP status code, repeated in the body
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, details: Value) -> Self {
        Self {
            message: code.default_message().to_string(),
            details,
            status: code.status().as_u16(),
            timestamp: Utc::now(),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
            AppError::InvalidId(_) => ErrorCode::InvalidId,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.code().status()
    }

    fn details(&self) -> Value {
        match self {
            AppError::JsonExtractorRejection(e) => Value::String(e.body_text()),
            AppError::ValidationError(e) => validation_details(e),
            AppError::InvalidId(raw) => Value::String(format!("Invalid id: {raw}")),
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg)
            | AppError::ServiceUnavailable(msg) => Value::String(msg.clone()),
        }
    }

    fn log(&self) {
        let code = self.code();
        match code.status() {
            status if status.is_server_error() => {
                tracing::error!(error_code = code.code(), error = %self, "Request failed")
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(error_code = code.code(), error = %self, "Request rejected")
            }
            _ => tracing::info!(error_code = code.code(), error = %self, "Request rejected"),
        }
    }
}

/// Flattens validator output into `{ field: [message, ...] }`.
///
/// Field names are reported as they appear on the wire (`event_at` becomes
/// `eventAt`), matching camelCase request bodies.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let map = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<Value> = errors
                .iter()
                .map(|err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", err.code));
                    Value::String(message)
                })
                .collect();
            (field.to_lower_camel_case(), Value::Array(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    Value::Object(map)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let code = self.code();
        let body = ErrorResponse::new(code, self.details());

        (code.status(), Json(body)).into_response()
    }
}

/// Builds an error response outside of an `AppError`.
pub fn error_response(code: ErrorCode, details: impl Into<Value>) -> Response {
    (code.status(), Json(ErrorResponse::new(code, details.into()))).into_response()
}
