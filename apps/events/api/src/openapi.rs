//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Management API",
        version = "1.0.0",
        description = "Create, list, update and soft-delete scheduled events"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    )
)]
pub struct ApiDoc;
