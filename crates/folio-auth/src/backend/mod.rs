//! The hosted auth backend as seen by the resolver and the sign-in routes.

pub mod gotrue;

pub use gotrue::GoTrueClient;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::session::StoredSession;

/// A user as verified by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Failure talking to the auth backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend answered and refused: invalid or expired token, bad code.
    #[error("rejected by auth backend ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// Unreachable, timed out, or a 5xx.
    #[error("auth backend unavailable: {0}")]
    Transport(String),
    /// The backend answered with a body that could not be understood.
    #[error("unexpected auth backend response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Parameters of the OAuth authorize redirect.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizeRequest<'a> {
    pub provider: &'a str,
    pub redirect_to: &'a str,
    pub scopes: &'a str,
    pub code_challenge: &'a str,
}

#[async_trait]
pub trait AuthBackend: Send + Sync + 'static {
    /// Verify an access token and return its user.
    async fn get_user(&self, access_token: &str) -> Result<BackendUser, BackendError>;

    /// Trade a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<StoredSession, BackendError>;

    /// Complete a PKCE authorization-code flow.
    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<StoredSession, BackendError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    /// Browser URL that starts the OAuth flow.
    fn authorize_url(&self, request: AuthorizeRequest<'_>) -> String;
}
