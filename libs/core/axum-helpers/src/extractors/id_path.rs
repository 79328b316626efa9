//! Numeric id path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extracts a positive 64-bit id from the single path parameter.
///
/// Anything else (non-numeric, zero, negative, overflow) is rejected with
/// a 400 instead of axum's default plain-text rejection.
///
/// # Example
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::IdPath;
///
/// async fn get_event(IdPath(id): IdPath) -> String {
///     format!("Event {id}")
/// }
///
/// let app: Router = Router::new().route("/events/{id}", get(get_event));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidId(e.body_text()))?;

        parse_id(&raw).map(IdPath)
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidId(raw.to_string())),
    }
}
