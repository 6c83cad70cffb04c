//! Object storage trait for project images.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// An object to be written to storage.
#[derive(Debug, Clone)]
pub struct ObjectUpload {
    /// Path within the bucket.
    pub path: String,
    /// Object contents.
    pub data: Bytes,
    /// MIME type stored with the object.
    pub content_type: String,
}

/// Trait for image storage backends.
///
/// Every call carries the caller's access token so the backend can apply
/// its own bucket policies on top of the admin gate.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "backend", "memory").
    fn provider_type(&self) -> &str;

    /// Write a new object. Fails if the path already exists. Returns the stored path.
    async fn upload(&self, access_token: &str, object: ObjectUpload) -> AppResult<String>;

    /// Remove objects by path. Missing paths are not an error.
    async fn remove(&self, access_token: &str, paths: &[String]) -> AppResult<()>;
}
