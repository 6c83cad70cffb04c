//! `AdminUser` extractor: the identity the admin gate attached to the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use folio_auth::Identity;
use folio_core::error::AppError;

use crate::error::ApiError;

/// A request that passed the admin gate.
///
/// Rejects with 401 when no identity is present, which is the case for any
/// handler mounted outside the gated prefixes.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

impl std::ops::Deref for AdminUser {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AdminUser)
            .ok_or_else(|| AppError::authentication("No admin identity on request").into())
    }
}
