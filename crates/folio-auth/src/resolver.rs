//! Identity resolution from session cookies.
//!
//! Resolution may rotate the session (refresh) or drop it (revoked refresh
//! token). Either way the cookie writes come back in [`Resolution::mutations`]
//! alongside the outcome, never on a shared client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use folio_core::config::AuthConfig;

use crate::backend::{AuthBackend, BackendError};
use crate::cookie::CookieMutation;
use crate::session::{SessionCookieCodec, SessionCookies, StoredSession};

/// The verified user behind one request. Must not outlive that request.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
    access_token: String,
}

impl Identity {
    pub fn new(user_id: Uuid, email: Option<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            email,
            access_token: access_token.into(),
        }
    }

    /// Bearer token for calls made on this user's behalf.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No session, or the backend refused it.
    #[error("no valid session")]
    Unauthenticated,
    /// The backend could not be consulted.
    #[error("identity provider unavailable: {0}")]
    Transport(String),
}

impl From<BackendError> for ResolveError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Rejected { .. } => Self::Unauthenticated,
            BackendError::Transport(msg) | BackendError::Decode(msg) => Self::Transport(msg),
        }
    }
}

/// Outcome of resolving one request together with the cookie writes it produced.
#[derive(Debug)]
pub struct Resolution {
    pub outcome: Result<Identity, ResolveError>,
    pub mutations: Vec<CookieMutation>,
}

#[async_trait]
pub trait IdentityResolver: Send + Sync + 'static {
    async fn resolve(&self, cookies: SessionCookies) -> Resolution;
}

/// Resolves identities against the auth backend using the session cookie.
#[derive(Clone)]
pub struct SessionResolver {
    backend: Arc<dyn AuthBackend>,
    codec: SessionCookieCodec,
    refresh_margin_seconds: i64,
}

impl SessionResolver {
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        codec: SessionCookieCodec,
        refresh_margin_seconds: i64,
    ) -> Self {
        Self {
            backend,
            codec,
            refresh_margin_seconds,
        }
    }

    pub fn from_config(backend: Arc<dyn AuthBackend>, config: &AuthConfig) -> Self {
        Self::new(
            backend,
            SessionCookieCodec::from_config(config),
            config.refresh_margin_seconds,
        )
    }

    pub fn codec(&self) -> &SessionCookieCodec {
        &self.codec
    }

    /// Resolve as of `now` (unix seconds).
    pub async fn resolve_at(&self, cookies: SessionCookies, now: i64) -> Resolution {
        let mut client = SessionClient {
            resolver: self,
            cookies,
            now,
        };
        let outcome = client.identity().await;
        Resolution {
            outcome,
            mutations: client.cookies.into_pending(),
        }
    }
}

#[async_trait]
impl IdentityResolver for SessionResolver {
    async fn resolve(&self, cookies: SessionCookies) -> Resolution {
        self.resolve_at(cookies, Utc::now().timestamp()).await
    }
}

/// Backend client scoped to a single request's cookies.
struct SessionClient<'a> {
    resolver: &'a SessionResolver,
    cookies: SessionCookies,
    now: i64,
}

impl SessionClient<'_> {
    async fn identity(&mut self) -> Result<Identity, ResolveError> {
        let codec = &self.resolver.codec;
        let session = match codec.load(self.cookies.snapshot()) {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!("No session cookie");
                return Err(ResolveError::Unauthenticated);
            }
            Err(e) => {
                debug!(error = %e, "Unreadable session cookie");
                return Err(ResolveError::Unauthenticated);
            }
        };

        let session = if session.expires_within(self.resolver.refresh_margin_seconds, self.now) {
            self.refresh(&session).await?
        } else {
            session
        };

        let user = self
            .resolver
            .backend
            .get_user(&session.access_token)
            .await
            .inspect_err(|e| match e {
                BackendError::Rejected { status, .. } => {
                    debug!(status, "Access token rejected");
                }
                other => warn!(error = %other, "User lookup failed"),
            })?;

        Ok(Identity::new(user.id, user.email, session.access_token))
    }

    async fn refresh(&mut self, stale: &StoredSession) -> Result<StoredSession, ResolveError> {
        let codec = &self.resolver.codec;
        match self.resolver.backend.refresh_session(&stale.refresh_token).await {
            Ok(fresh) => {
                match codec.store(&fresh, self.cookies.snapshot()) {
                    Ok(mutations) => self.cookies.queue_mutations(mutations),
                    Err(e) => warn!(error = %e, "Failed to encode refreshed session"),
                }
                info!(expires_at = ?fresh.expires_at, "Session refreshed");
                Ok(fresh)
            }
            Err(BackendError::Rejected { status, message }) => {
                info!(status, reason = %message, "Refresh token rejected, clearing session");
                let removals = codec.clear(self.cookies.snapshot());
                self.cookies.queue_mutations(removals);
                Err(ResolveError::Unauthenticated)
            }
            Err(e) => {
                warn!(error = %e, "Session refresh failed");
                Err(e.into())
            }
        }
    }
}
