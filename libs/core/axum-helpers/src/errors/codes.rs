//! Error kinds and the single place where they map to HTTP status codes.
//!
//! # Example
//!
//! ```rust
//! use axum::http::StatusCode;
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.as_str(), "NOT_FOUND");
//! assert_eq!(code.status(), StatusCode::NOT_FOUND);
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Declarative request validation failed
    ValidationError,

    /// Path identifier is not a positive integer
    InvalidId,

    /// Request body is not valid JSON for the target type
    InvalidJson,

    /// Domain rule rejected the input, or the resource does not exist
    BadRequest,

    /// No route matched
    NotFound,

    // Server errors (5000-5999)
    InternalError,

    ServiceUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code attached to log records.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidJson => 1003,
            Self::BadRequest => 1004,
            Self::NotFound => 1005,
            Self::InternalError => 5001,
            Self::ServiceUnavailable => 5003,
        }
    }

    /// The `message` field of the error body.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError | Self::InvalidId | Self::InvalidJson | Self::BadRequest => {
                "Validation error"
            }
            Self::NotFound => "Not found",
            Self::InternalError => "Internal server error",
            Self::ServiceUnavailable => "Service unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::InvalidId | Self::InvalidJson | Self::BadRequest => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 7] = [
        ErrorCode::ValidationError,
        ErrorCode::InvalidId,
        ErrorCode::InvalidJson,
        ErrorCode::BadRequest,
        ErrorCode::NotFound,
        ErrorCode::InternalError,
        ErrorCode::ServiceUnavailable,
    ];

    #[test]
    fn test_client_kinds_are_bad_request() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::InvalidId,
            ErrorCode::InvalidJson,
            ErrorCode::BadRequest,
        ] {
            assert_eq!(code.status(), StatusCode::BAD_REQUEST, "{code}");
            assert_eq!(code.default_message(), "Validation error");
        }
    }

    #[test]
    fn test_server_kinds() {
        assert_eq!(
            ErrorCode::InternalError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::ServiceUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<i32> = ALL.iter().map(ErrorCode::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn test_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::InvalidJson).unwrap();
        assert_eq!(json, "\"INVALID_JSON\"");
    }
}
