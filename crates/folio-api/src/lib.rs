//! # folio-api
//!
//! HTTP layer for Folio built on Axum.
//!
//! Public pages and the public project listing are served as-is. Everything
//! under the configured admin prefixes passes through the
//! [`middleware::gate::admin_gate`] middleware first, which either attaches
//! the verified admin identity to the request or answers with a redirect or
//! JSON denial. Cookie writes produced by the gate are relayed onto whatever
//! response leaves the middleware.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiErrorResponse};
pub use state::AppState;
