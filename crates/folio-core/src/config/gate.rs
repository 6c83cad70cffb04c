//! Admin gate configuration.

use serde::{Deserialize, Serialize};

/// Which paths the admin gate guards and where denied browsers are sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Path prefixes of browser-facing admin pages.
    #[serde(default = "default_browser_prefixes")]
    pub browser_prefixes: Vec<String>,
    /// Path prefixes of admin JSON endpoints.
    #[serde(default = "default_api_prefixes")]
    pub api_prefixes: Vec<String>,
    /// Redirect target for unauthenticated browser requests.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    /// Redirect target for authenticated but non-admin browser requests.
    #[serde(default = "default_landing_path")]
    pub landing_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            browser_prefixes: default_browser_prefixes(),
            api_prefixes: default_api_prefixes(),
            sign_in_path: default_sign_in_path(),
            landing_path: default_landing_path(),
        }
    }
}

fn default_browser_prefixes() -> Vec<String> {
    vec!["/admin".to_string()]
}

fn default_api_prefixes() -> Vec<String> {
    vec!["/api/admin".to_string()]
}

fn default_sign_in_path() -> String {
    "/login".to_string()
}

fn default_landing_path() -> String {
    "/".to_string()
}
