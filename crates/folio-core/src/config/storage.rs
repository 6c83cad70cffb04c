//! Image storage configuration.

use serde::{Deserialize, Serialize};

/// Object storage settings for project images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider: `"backend"` (hosted bucket next to the auth backend) or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Bucket holding project images.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// `Cache-Control` max-age (seconds) stored with uploaded objects.
    #[serde(default = "default_cache_control")]
    pub cache_control_seconds: u64,
    /// Maximum accepted upload body in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            bucket: default_bucket(),
            cache_control_seconds: default_cache_control(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_provider() -> String {
    "backend".to_string()
}

fn default_bucket() -> String {
    "project-images".to_string()
}

fn default_cache_control() -> u64 {
    3600
}

fn default_max_upload() -> u64 {
    10 * 1024 * 1024
}
