//! CORS configuration.
//!
//! Cookie-based sessions require credentialed CORS, so origins come from an
//! explicit allowlist instead of a wildcard.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::StorefrontConfig;

/// Build the CORS layer from the configured origin allowlist.
///
/// Returns `None` when no origins are configured (same-origin deployments
/// need no CORS layer at all). Unparseable origins are skipped with a
/// warning.
#[must_use]
pub fn create_cors_layer(config: &StorefrontConfig) -> Option<CorsLayer> {
    if config.allowed_origins.is_empty() {
        return None;
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
