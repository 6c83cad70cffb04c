//! Hosted bucket storage reached over the backend's storage REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::traits::storage::{ObjectStorage, ObjectUpload};

/// Error body returned by the storage API.
#[derive(Debug, Deserialize)]
struct StorageErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Object storage client for one bucket.
#[derive(Debug, Clone)]
pub struct BackendStorage {
    http: Client,
    base_url: Url,
    publishable_key: String,
    bucket: String,
    cache_control: String,
}

impl BackendStorage {
    /// Create a client for `bucket` on the backend at `backend_url`.
    pub fn new(
        backend_url: &str,
        publishable_key: &str,
        bucket: &str,
        cache_control_seconds: u64,
        timeout: Duration,
    ) -> AppResult<Self> {
        let base_url = Url::parse(backend_url).map_err(|e| {
            AppError::configuration(format!("Invalid backend URL '{backend_url}': {e}"))
        })?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "HTTP client", e))?;

        Ok(Self {
            http,
            base_url,
            publishable_key: publishable_key.to_string(),
            bucket: bucket.to_string(),
            cache_control: format!("max-age={cache_control_seconds}"),
        })
    }

    fn object_url(&self, path: Option<&str>) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::configuration("Backend URL cannot be a base"))?;
            segments.pop_if_empty().extend(["storage", "v1", "object", self.bucket.as_str()]);
            if let Some(path) = path {
                segments.extend(path.split('/'));
            }
        }
        Ok(url)
    }

    async fn error_from(response: reqwest::Response, action: &str) -> AppError {
        let status = response.status();
        let body = response.json::<StorageErrorBody>().await.ok();
        let detail = body
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| status.to_string());
        warn!(status = %status.as_u16(), action, detail = %detail, "Storage request rejected");
        if status.is_server_error() {
            AppError::external(format!("{action} failed: {detail}"))
        } else {
            AppError::storage(detail)
        }
    }
}

#[async_trait]
impl ObjectStorage for BackendStorage {
    fn provider_type(&self) -> &str {
        "backend"
    }

    async fn upload(&self, access_token: &str, object: ObjectUpload) -> AppResult<String> {
        let url = self.object_url(Some(&object.path))?;
        let size = object.data.len();

        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .header("apikey", &self.publishable_key)
            .header("content-type", &object.content_type)
            .header("cache-control", &self.cache_control)
            .header("x-upsert", "false")
            .body(object.data)
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "Upload failed", e))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Upload").await);
        }

        debug!(bucket = %self.bucket, path = %object.path, size, "Object uploaded");
        Ok(object.path)
    }

    async fn remove(&self, access_token: &str, paths: &[String]) -> AppResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = self.object_url(None)?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(access_token)
            .header("apikey", &self.publishable_key)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "Remove failed", e))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Ok(()),
            _ => Err(Self::error_from(response, "Remove").await),
        }
    }
}
