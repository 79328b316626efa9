//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "message": "Internal server error",
        "details": "connection pool timed out",
        "status": 500,
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - request body failed validation",
    content_type = "application/json",
    example = json!({
        "message": "Validation error",
        "details": {
            "title": ["title must not be blank"]
        },
        "status": 400,
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - unknown id, invalid id, or domain rule violation",
    content_type = "application/json",
    example = json!({
        "message": "Validation error",
        "details": "Event not found with id: 42",
        "status": 400,
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "message": "Service unavailable",
        "details": "database unreachable",
        "status": 503,
        "timestamp": "2025-01-01T12:00:00Z"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
