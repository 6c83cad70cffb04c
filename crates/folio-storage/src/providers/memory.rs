//! In-memory object storage.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::traits::storage::{ObjectStorage, ObjectUpload};

/// A stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object contents.
    pub data: Bytes,
    /// MIME type.
    pub content_type: String,
}

/// Keeps objects in a process-local map. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an object by path.
    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn upload(&self, _access_token: &str, object: ObjectUpload) -> AppResult<String> {
        let mut objects = self.objects.write().await;
        if objects.contains_key(&object.path) {
            return Err(AppError::storage(format!(
                "Object '{}' already exists",
                object.path
            )));
        }
        objects.insert(
            object.path.clone(),
            StoredObject {
                data: object.data,
                content_type: object.content_type,
            },
        );
        Ok(object.path)
    }

    async fn remove(&self, _access_token: &str, paths: &[String]) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }
}
