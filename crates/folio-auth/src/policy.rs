//! Admin capability check.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use folio_core::result::AppResult;
use folio_database::repositories::ProfileRepository;

use crate::resolver::Identity;

/// Keyed read of a user's admin flag.
#[async_trait]
pub trait ProfileLookup: Send + Sync + 'static {
    /// `Ok(None)` when no profile row exists.
    async fn admin_flag(&self, user_id: Uuid) -> AppResult<Option<bool>>;
}

#[async_trait]
impl ProfileLookup for ProfileRepository {
    async fn admin_flag(&self, user_id: Uuid) -> AppResult<Option<bool>> {
        ProfileRepository::admin_flag(self, user_id).await
    }
}

/// The profile store could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("profile lookup failed: {0}")]
pub struct PolicyLookupFailed(pub String);

/// Decides whether an identity may use the admin surface.
#[derive(Clone)]
pub struct AuthorizationPolicy {
    profiles: Arc<dyn ProfileLookup>,
}

impl AuthorizationPolicy {
    pub fn new(profiles: Arc<dyn ProfileLookup>) -> Self {
        Self { profiles }
    }

    /// True only when the profile row exists and its flag is set.
    pub async fn is_admin(&self, identity: &Identity) -> Result<bool, PolicyLookupFailed> {
        match self.profiles.admin_flag(identity.user_id).await {
            Ok(flag) => {
                let is_admin = flag.unwrap_or(false);
                debug!(user_id = %identity.user_id, has_profile = flag.is_some(), is_admin, "Admin flag read");
                Ok(is_admin)
            }
            Err(e) => {
                warn!(user_id = %identity.user_id, error = %e, "Admin flag lookup failed");
                Err(PolicyLookupFailed(e.message))
            }
        }
    }
}
