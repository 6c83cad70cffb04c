//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use folio_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// Session cookies only cross origins with credentials, which browsers refuse
/// for a wildcard origin, so credentials are allowed only for listed origins.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods(methods)
        .max_age(Duration::from_secs(config.max_age_seconds));

    if config.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    layer
        .allow_origin(origins)
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
