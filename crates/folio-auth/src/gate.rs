//! The admin request gate.
//!
//! `evaluate` authenticates first and authorizes second; the policy is never
//! consulted without an identity. Every failure maps to a denial, and every
//! decision carries the cookie writes produced while reaching it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cookie::CookieMutation;
use crate::policy::AuthorizationPolicy;
use crate::resolver::{Identity, IdentityResolver, ResolveError};
use crate::session::SessionCookies;

/// Terminal state of one gate evaluation.
#[derive(Debug)]
pub enum AuthorizationDecision {
    Allowed {
        identity: Identity,
        mutations: Vec<CookieMutation>,
    },
    DeniedUnauthenticated {
        mutations: Vec<CookieMutation>,
    },
    DeniedForbidden {
        mutations: Vec<CookieMutation>,
    },
}

impl AuthorizationDecision {
    pub fn mutations(&self) -> &[CookieMutation] {
        match self {
            Self::Allowed { mutations, .. }
            | Self::DeniedUnauthenticated { mutations }
            | Self::DeniedForbidden { mutations } => mutations,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allowed { .. } => "allowed",
            Self::DeniedUnauthenticated { .. } => "unauthenticated",
            Self::DeniedForbidden { .. } => "forbidden",
        }
    }
}

#[derive(Clone)]
pub struct RequestGate {
    resolver: Arc<dyn IdentityResolver>,
    policy: AuthorizationPolicy,
}

impl RequestGate {
    pub fn new(resolver: Arc<dyn IdentityResolver>, policy: AuthorizationPolicy) -> Self {
        Self { resolver, policy }
    }

    pub async fn evaluate(&self, cookies: SessionCookies) -> AuthorizationDecision {
        let resolution = self.resolver.resolve(cookies).await;
        let mutations = resolution.mutations;

        let identity = match resolution.outcome {
            Ok(identity) => identity,
            Err(ResolveError::Unauthenticated) => {
                return AuthorizationDecision::DeniedUnauthenticated { mutations };
            }
            Err(ResolveError::Transport(reason)) => {
                info!(reason = %reason, "Identity provider unavailable, denying");
                return AuthorizationDecision::DeniedForbidden { mutations };
            }
        };

        match self.policy.is_admin(&identity).await {
            Ok(true) => {
                debug!(user_id = %identity.user_id, "Admin access granted");
                AuthorizationDecision::Allowed {
                    identity,
                    mutations,
                }
            }
            Ok(false) => {
                info!(user_id = %identity.user_id, "Admin access refused");
                AuthorizationDecision::DeniedForbidden { mutations }
            }
            Err(e) => {
                info!(user_id = %identity.user_id, error = %e, "Admin check failed, denying");
                AuthorizationDecision::DeniedForbidden { mutations }
            }
        }
    }
}
