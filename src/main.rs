//! Folio server: portfolio site with a gated admin area.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use folio_api::{AppState, build_app};
use folio_auth::{
    AuthBackend, AuthorizationPolicy, GoTrueClient, ProtectedRoutes, RequestGate,
    SessionResolver,
};
use folio_core::config::AppConfig;
use folio_core::error::AppError;
use folio_database::DatabasePool;
use folio_database::repositories::{ProfileRepository, ProjectRepository};

#[tokio::main]
async fn main() {
    let env = std::env::var("FOLIO_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Folio");

    // ── Step 1: Database ─────────────────────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    let profiles = Arc::new(ProfileRepository::new(db.pool().clone()));
    let projects = Arc::new(ProjectRepository::new(db.pool().clone()));

    // ── Step 2: Auth backend and gate ────────────────────────────
    let auth_backend: Arc<dyn AuthBackend> = Arc::new(GoTrueClient::from_config(&config.auth)?);
    let resolver = SessionResolver::from_config(Arc::clone(&auth_backend), &config.auth);
    let session_codec = resolver.codec().clone();
    let gate = RequestGate::new(Arc::new(resolver), AuthorizationPolicy::new(profiles));
    let protected = Arc::new(ProtectedRoutes::from_config(&config.gate));
    tracing::info!(
        cookie = session_codec.name(),
        browser_prefixes = ?config.gate.browser_prefixes,
        api_prefixes = ?config.gate.api_prefixes,
        "Admin gate configured"
    );

    // ── Step 3: Image storage ────────────────────────────────────
    let images = folio_storage::build_provider(&config.storage, &config.auth)?;
    tracing::info!(
        provider = images.provider_type(),
        bucket = %config.storage.bucket,
        "Image storage initialized"
    );

    // ── Step 4: Build and start HTTP server ──────────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        gate,
        protected,
        auth_backend,
        session_codec,
        projects,
        images,
    };

    let app = build_app(state, &config.server.cors);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Folio server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("Folio server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
