//! Application builder: wires router, middleware, and state into an Axum app.

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use folio_core::config::CorsConfig;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}
