//! Which request paths the gate protects.

use folio_core::config::GateConfig;

/// How a denial is presented to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Page navigation: denials redirect.
    Browser,
    /// JSON API: denials are status codes with a JSON body.
    Api,
}

/// Path prefixes guarded by the gate.
#[derive(Debug, Clone)]
pub struct ProtectedRoutes {
    browser_prefixes: Vec<String>,
    api_prefixes: Vec<String>,
}

impl ProtectedRoutes {
    pub fn new(browser_prefixes: Vec<String>, api_prefixes: Vec<String>) -> Self {
        Self {
            browser_prefixes: browser_prefixes.into_iter().map(normalize).collect(),
            api_prefixes: api_prefixes.into_iter().map(normalize).collect(),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.browser_prefixes.clone(), config.api_prefixes.clone())
    }

    /// `None` for paths the gate must not touch. API prefixes win over
    /// browser prefixes.
    pub fn classify(&self, path: &str) -> Option<Surface> {
        if self.api_prefixes.iter().any(|p| matches_prefix(p, path)) {
            Some(Surface::Api)
        } else if self.browser_prefixes.iter().any(|p| matches_prefix(p, path)) {
            Some(Surface::Browser)
        } else {
            None
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.classify(path).is_some()
    }
}

fn normalize(prefix: String) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Segment-aware: `/admin` covers `/admin` and `/admin/x`, not `/administrator`.
fn matches_prefix(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => prefix == "/" || rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
