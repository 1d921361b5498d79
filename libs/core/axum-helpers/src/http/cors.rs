use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Comma-separated list of origins allowed to call the API.
pub const CORS_ENV_VAR: &str = "CORS_ALLOWED_ORIGIN";

/// Parses a comma-separated origin list, ignoring blanks.
///
/// Fails on an unparsable origin or when nothing is left after trimming.
pub fn parse_allowed_origins(value: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {CORS_ENV_VAR} value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{CORS_ENV_VAR} cannot be empty"),
        ));
    }

    Ok(origins)
}

/// CORS for the catalog API:
/// - the given origins
/// - GET, POST, PUT, DELETE, OPTIONS
/// - Content-Type, Accept, Authorization
/// - credentials allowed, 1 hour max age
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
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

/// Builds the CORS layer from the required `CORS_ALLOWED_ORIGIN` variable.
///
/// Examples:
/// - Development: `CORS_ALLOWED_ORIGIN=http://localhost:3000,http://localhost:5173`
/// - Production: `CORS_ALLOWED_ORIGIN=https://books.example.com`
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let value = std::env::var(CORS_ENV_VAR).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{CORS_ENV_VAR} environment variable is required. Example: {CORS_ENV_VAR}=http://localhost:3000"
            ),
        )
    })?;

    let origins = parse_allowed_origins(&value)?;
    info!("CORS configured with allowed origins: {}", value);
    Ok(create_cors_layer(origins))
}
