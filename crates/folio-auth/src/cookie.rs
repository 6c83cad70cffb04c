//! Pending cookie writes.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Transport attributes of a cookie write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: Option<String>,
    pub domain: Option<String>,
    /// `Max-Age` in seconds. `Some(0)` expires the cookie immediately.
    pub max_age_seconds: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

/// A cookie write queued while handling a request and applied to the
/// outgoing response by [`crate::relay::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieMutation {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

impl CookieMutation {
    /// Set `name` to `value`.
    pub fn set(name: impl Into<String>, value: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options,
        }
    }

    /// Expire `name`. Path and domain must match the original cookie for
    /// the browser to drop it, so they are kept from `options`.
    pub fn remove(name: impl Into<String>, options: &CookieOptions) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            options: CookieOptions {
                max_age_seconds: Some(0),
                ..options.clone()
            },
        }
    }

    /// True if this write expires the cookie.
    pub fn is_removal(&self) -> bool {
        self.options.max_age_seconds == Some(0)
    }

    /// Render as a `Cookie` ready for a `Set-Cookie` header.
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name.clone(), self.value.clone()))
            .http_only(self.options.http_only)
            .secure(self.options.secure);

        if let Some(path) = &self.options.path {
            builder = builder.path(path.clone());
        }
        if let Some(domain) = &self.options.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(seconds) = self.options.max_age_seconds {
            builder = builder.max_age(Duration::seconds(seconds));
        }
        if let Some(same_site) = self.options.same_site {
            builder = builder.same_site(same_site);
        }

        builder.build()
    }
}
