//! Per-request session store adapter.
//!
//! Reads come from the inbound `Cookie` header snapshot; writes are only
//! queued, since writing to an inbound request cannot affect that request.
//! The queued writes leave through [`SessionCookies::into_pending`].

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum_extra::extract::cookie::Cookie;

use crate::cookie::CookieMutation;

/// Ordered `(name, value)` pairs from the inbound `Cookie` header(s).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    pairs: Vec<(String, String)>,
}

impl RequestCookies {
    /// Parse every `Cookie` header with the cookie crate's request-header
    /// splitter. Unparseable pairs and non-ASCII headers are skipped. Values
    /// wrapped in double quotes are unwrapped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let pairs = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| Cookie::split_parse(raw))
            .filter_map(Result::ok)
            .map(|cookie| (cookie.name().to_string(), cookie.value_trimmed().to_string()))
            .collect();
        Self { pairs }
    }

    /// Build from explicit pairs.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }

    /// All pairs in header order.
    pub fn read_all(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// First value sent under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a cookie named `name` was sent.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The session store adapter handed to the identity resolver for one request.
#[derive(Debug, Default)]
pub struct SessionCookies {
    snapshot: RequestCookies,
    pending: Vec<CookieMutation>,
}

impl SessionCookies {
    /// Wrap a request's cookie snapshot.
    pub fn new(snapshot: RequestCookies) -> Self {
        Self {
            snapshot,
            pending: Vec::new(),
        }
    }

    /// Snapshot the cookies of an inbound request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(RequestCookies::from_headers(headers))
    }

    /// Ordered `(name, value)` pairs of the inbound request.
    pub fn read_all(&self) -> &[(String, String)] {
        self.snapshot.read_all()
    }

    pub fn snapshot(&self) -> &RequestCookies {
        &self.snapshot
    }

    /// Append writes to the pending buffer, preserving order.
    pub fn queue_mutations<I>(&mut self, mutations: I)
    where
        I: IntoIterator<Item = CookieMutation>,
    {
        self.pending.extend(mutations);
    }

    pub fn pending(&self) -> &[CookieMutation] {
        &self.pending
    }

    /// Consume the adapter, yielding the queued writes in insertion order.
    pub fn into_pending(self) -> Vec<CookieMutation> {
        self.pending
    }
}
