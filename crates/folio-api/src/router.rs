//! Route definitions.
//!
//! Pages and auth routes live at the root, JSON endpoints under `/api`. The
//! admin gate wraps the whole router and decides per path whether to act.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::get,
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with every route, the admin gate, and request logging.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes).unwrap_or(usize::MAX);

    Router::new()
        .merge(page_routes())
        .merge(auth_routes())
        .nest("/api", public_api_routes().merge(admin_api_routes()))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::gate::admin_gate,
        ))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Public and admin HTML pages
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/login", get(handlers::pages::login))
        .route("/admin", get(handlers::pages::admin_home))
        .route("/admin/projects", get(handlers::pages::admin_projects))
}

/// OAuth sign-in flow
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signin", get(handlers::auth::sign_in))
        .route("/auth/callback", get(handlers::auth::callback))
        .route(
            "/auth/signout",
            get(handlers::auth::sign_out).post(handlers::auth::sign_out),
        )
}

fn public_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/projects", get(handlers::projects::list_published))
}

/// Admin JSON endpoints, reachable only through the gate
fn admin_api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/projects",
            get(handlers::projects::list_all)
                .post(handlers::projects::upsert)
                .delete(handlers::projects::delete),
        )
        .route(
            "/admin/project-image",
            axum::routing::post(handlers::project_image::upload)
                .delete(handlers::project_image::remove),
        )
}
