//! Writes pending cookie mutations onto an outgoing response.

use std::collections::HashSet;

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, Response};
use axum_extra::extract::cookie::Cookie;
use tracing::warn;

use crate::cookie::CookieMutation;

/// Apply `mutations` as `Set-Cookie` headers.
///
/// When a name appears more than once the last write wins. Existing
/// `Set-Cookie` headers for the same names are replaced, so applying the
/// same set twice emits each cookie once. Other headers are untouched.
pub fn apply<B>(mut response: Response<B>, mutations: &[CookieMutation]) -> Response<B> {
    if mutations.is_empty() {
        return response;
    }

    let mut seen = HashSet::new();
    let mut effective: Vec<&CookieMutation> = mutations
        .iter()
        .rev()
        .filter(|m| seen.insert(m.name.as_str()))
        .collect();
    effective.reverse();

    let headers = response.headers_mut();
    let kept: Vec<HeaderValue> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter(|value| !set_cookie_name(value).is_some_and(|name| seen.contains(name.as_str())))
        .cloned()
        .collect();
    headers.remove(SET_COOKIE);
    for value in kept {
        headers.append(SET_COOKIE, value);
    }

    for mutation in effective {
        match HeaderValue::from_str(&mutation.to_cookie().to_string()) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(e) => warn!(cookie = %mutation.name, error = %e, "Dropping unencodable cookie"),
        }
    }
    response
}

fn set_cookie_name(value: &HeaderValue) -> Option<String> {
    let raw = value.to_str().ok()?;
    Cookie::parse(raw).ok().map(|cookie| cookie.name().to_string())
}
