//! Profile entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of `profiles`, keyed 1:1 by the auth backend's user id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Same value as the auth backend's user id.
    pub id: Uuid,
    /// Grants access to the admin area.
    pub is_admin: bool,
}
