//! API routes module

pub mod events;
pub mod health;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Routes nested under `/api` by `create_router`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/events", events::router(state))
}

/// `GET /ready`, kept outside `/api` next to `/health`
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
