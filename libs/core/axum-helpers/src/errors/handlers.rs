use axum::{http::Uri, response::Response};

use super::{ErrorCode, error_response};

/// Fallback handler for unmatched routes.
pub async fn not_found(uri: Uri) -> Response {
    error_response(ErrorCode::NotFound, format!("No route for {}", uri.path()))
}
