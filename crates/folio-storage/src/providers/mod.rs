//! Storage provider implementations.

pub mod backend;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use folio_core::config::{AuthConfig, StorageConfig};
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::traits::storage::ObjectStorage;

pub use backend::BackendStorage;
pub use memory::MemoryStorage;

/// Build the configured image storage provider.
pub fn build_provider(
    storage: &StorageConfig,
    auth: &AuthConfig,
) -> AppResult<Arc<dyn ObjectStorage>> {
    match storage.provider.as_str() {
        "backend" => {
            let provider = BackendStorage::new(
                &auth.backend_url,
                &auth.publishable_key,
                &storage.bucket,
                storage.cache_control_seconds,
                Duration::from_secs(auth.request_timeout_seconds),
            )?;
            Ok(Arc::new(provider))
        }
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider '{other}'"
        ))),
    }
}
