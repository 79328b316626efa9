use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AppError, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::EventResult;
use crate::models::{EventPage, EventRequest, EventResponse, PageRequest};
use crate::repository::EventRepository;
use crate::service::EventService;

/// OpenAPI documentation for the Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        get_event,
        update_event,
        delete_event,
        restore_event,
    ),
    components(
        schemas(EventRequest, EventResponse, EventPage),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Event management endpoints")
    )
)]
pub struct ApiDoc;

/// Event routes, relative to wherever the router is nested.
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/{id}/restore", post(restore_event))
        .with_state(shared_service)
}

/// List live events, oldest first
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    params(PageRequest),
    responses(
        (status = 200, description = "One page of events", body = EventPage),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<EventPage>, AppError> {
    let Query(request) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let page = service.list_events(request).await?;
    Ok(Json(page))
}

/// Create an event
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<EventRequest>,
) -> EventResult<impl IntoResponse> {
    let event = service.create_event(input.into()).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get a live event by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<Json<EventResponse>> {
    let event = service.get_event(id).await?;
    Ok(Json(event))
}

/// Replace the editable fields of an event
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<EventRequest>,
) -> EventResult<Json<EventResponse>> {
    let event = service.update_event(id, input.into()).await?;
    Ok(Json(event))
}

/// Soft-delete an event
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<StatusCode> {
    service.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bring back a soft-deleted event
#[utoipa::path(
    post,
    path = "/{id}/restore",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event restored", body = EventResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn restore_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    IdPath(id): IdPath,
) -> EventResult<Json<EventResponse>> {
    let event = service.restore_event(id).await?;
    Ok(Json(event))
}
