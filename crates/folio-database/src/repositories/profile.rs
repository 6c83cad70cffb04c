//! Profile repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_entity::profile::Profile;

/// Read-only access to `profiles`.
///
/// Rows are provisioned outside this service; nothing here inserts them.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by user id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, COALESCE(is_admin, false) AS is_admin FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))
    }

    /// Read only the admin flag. `None` when the user has no profile row
    /// or the flag is `NULL`.
    pub async fn admin_flag(&self, id: Uuid) -> AppResult<Option<bool>> {
        sqlx::query_scalar::<_, Option<bool>>("SELECT is_admin FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(Option::flatten)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to read admin flag", e)
            })
    }
}
