use axum::http::{HeaderValue, Method, header};
use core_config::Environment;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// CORS layer restricted to `allowed_origins`.
///
/// Methods: GET, POST, PUT, DELETE, OPTIONS. Credentials allowed, 1 hour max age.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Allows any origin. Development only.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Picks the CORS policy from configuration.
///
/// - origins configured: restrict to them
/// - none configured, development: permissive
/// - none configured, production: same-origin only
///
/// # Errors
/// Returns `InvalidInput` when an origin is not a valid header value.
pub fn cors_layer(origins: &[String], environment: &Environment) -> io::Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(if environment.is_development() {
            info!("CORS_ALLOWED_ORIGIN not set, using permissive CORS for development");
            create_permissive_cors_layer()
        } else {
            warn!("CORS_ALLOWED_ORIGIN not set, cross-origin requests will be rejected");
            CorsLayer::new()
        });
    }

    let allowed = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {e}"),
            )
        })?;

    info!(origins = ?origins, "CORS configured");
    Ok(create_cors_layer(allowed))
}
