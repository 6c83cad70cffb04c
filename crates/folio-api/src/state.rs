//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use folio_auth::{AuthBackend, ProtectedRoutes, RequestGate, SessionCookieCodec};
use folio_core::config::AppConfig;
use folio_core::traits::ObjectStorage;
use folio_database::repositories::ProjectStore;

/// Passed to every Axum handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Admin gate: identity resolution followed by the admin policy.
    pub gate: RequestGate,
    /// Paths the gate guards.
    pub protected: Arc<ProtectedRoutes>,
    /// Auth backend used by the sign-in, callback, and sign-out routes.
    pub auth_backend: Arc<dyn AuthBackend>,
    /// Session cookie names and attributes.
    pub session_codec: SessionCookieCodec,

    // ── Data ─────────────────────────────────────────────────
    pub projects: Arc<dyn ProjectStore>,
    /// Project image bucket.
    pub images: Arc<dyn ObjectStorage>,
}
