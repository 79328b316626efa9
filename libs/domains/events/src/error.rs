use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found with id: {0}")]
    NotFound(i64),

    /// A field rule of the entity was violated
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Internal(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<DbErr> for EventError {
    fn from(err: DbErr) -> Self {
        EventError::Internal(err.to_string())
    }
}

/// Not-found is answered with 400, like any other rejected argument.
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(_) => AppError::BadRequest(err.to_string()),
            EventError::InvalidArgument(msg) => AppError::BadRequest(msg),
            EventError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
