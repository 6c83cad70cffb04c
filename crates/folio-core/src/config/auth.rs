//! Auth backend and session cookie configuration.

use serde::{Deserialize, Serialize};

/// Settings for the hosted auth backend and the session cookies it issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the hosted backend (e.g. `https://<ref>.supabase.co`).
    pub backend_url: String,
    /// Publishable (anon) key sent as `apikey` on every backend call.
    pub publishable_key: String,
    /// Explicit session cookie name. Derived from the backend URL when unset.
    #[serde(default)]
    pub cookie_name: Option<String>,
    /// Whether session cookies carry the `Secure` attribute.
    #[serde(default = "default_true")]
    pub secure_cookies: bool,
    /// Session cookie lifetime in days.
    #[serde(default = "default_cookie_max_age_days")]
    pub cookie_max_age_days: i64,
    /// Refresh the access token when it expires within this many seconds.
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_seconds: i64,
    /// OAuth provider used by the sign-in route.
    #[serde(default = "default_provider")]
    pub oauth_provider: String,
    /// Space-separated OAuth scopes requested from the provider.
    #[serde(default = "default_scopes")]
    pub oauth_scopes: String,
    /// Timeout for every backend request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl AuthConfig {
    /// Name of the session cookie: `sb-<project-ref>-auth-token` unless overridden.
    pub fn session_cookie_name(&self) -> String {
        if let Some(name) = &self.cookie_name {
            return name.clone();
        }
        let host = self
            .backend_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.backend_url);
        let project_ref = host
            .split(['/', ':', '.'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("local");
        format!("sb-{project_ref}-auth-token")
    }
}

fn default_true() -> bool {
    true
}

fn default_cookie_max_age_days() -> i64 {
    400
}

fn default_refresh_margin() -> i64 {
    60
}

fn default_provider() -> String {
    "github".to_string()
}

fn default_scopes() -> String {
    "read:user user:email".to_string()
}

fn default_request_timeout() -> u64 {
    10
}
