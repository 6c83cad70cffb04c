//! Encoding of the backend session into cookies.
//!
//! The session JSON is stored as `base64-<url-safe base64>` under the
//! configured cookie name. Values longer than [`MAX_CHUNK_SIZE`] are split
//! across `<name>.0`, `<name>.1`, ... and reassembled on read.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::{DecodePaddingMode, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use axum_extra::extract::cookie::SameSite;
use folio_core::config::AuthConfig;

use super::store::RequestCookies;
use crate::cookie::{CookieMutation, CookieOptions};

/// Largest value written to a single cookie.
pub const MAX_CHUNK_SIZE: usize = 3180;

const BASE64_PREFIX: &str = "base64-";

const VERIFIER_MAX_AGE_SECONDS: i64 = 600;

/// Accepts padded and unpadded input.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Session as issued by the auth backend's token endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

impl StoredSession {
    /// True if the access token expires at or before `now + margin_seconds`.
    /// A session without an expiry is left for the backend to judge.
    pub fn expires_within(&self, margin_seconds: i64, now: i64) -> bool {
        self.expires_at
            .is_some_and(|at| at <= now.saturating_add(margin_seconds))
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Errors decoding a session cookie.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid base64 in session cookie: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes the session cookie family.
#[derive(Debug, Clone)]
pub struct SessionCookieCodec {
    name: String,
    options: CookieOptions,
}

impl SessionCookieCodec {
    pub fn new(name: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Cookie name and default attributes from the auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.session_cookie_name(),
            CookieOptions {
                path: Some("/".to_string()),
                domain: None,
                max_age_seconds: Some(config.cookie_max_age_days.saturating_mul(86_400)),
                http_only: false,
                secure: config.secure_cookies,
                same_site: Some(SameSite::Lax),
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &CookieOptions {
        &self.options
    }

    pub fn verifier_cookie_name(&self) -> String {
        format!("{}-code-verifier", self.name)
    }

    /// Load the session from a cookie snapshot.
    ///
    /// `Ok(None)` when no session cookie is present. A single cookie under
    /// the base name wins over chunks; chunks are read from `.0` up to the
    /// first missing index.
    pub fn load(&self, cookies: &RequestCookies) -> Result<Option<StoredSession>, CodecError> {
        let raw = match cookies.get(&self.name) {
            Some(value) => value.to_string(),
            None => {
                let mut joined = String::new();
                let mut index = 0usize;
                while let Some(chunk) = cookies.get(&self.chunk_name(index)) {
                    joined.push_str(chunk);
                    index += 1;
                }
                if index == 0 {
                    return Ok(None);
                }
                joined
            }
        };

        if raw.is_empty() {
            return Ok(None);
        }
        self.decode(&raw).map(Some)
    }

    pub fn encode(&self, session: &StoredSession) -> Result<String, CodecError> {
        let json = serde_json::to_vec(session)?;
        Ok(format!("{BASE64_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
    }

    pub fn decode(&self, raw: &str) -> Result<StoredSession, CodecError> {
        match raw.strip_prefix(BASE64_PREFIX) {
            Some(encoded) => {
                let bytes = LENIENT_URL_SAFE.decode(encoded)?;
                Ok(serde_json::from_slice(&bytes)?)
            }
            None => Ok(serde_json::from_str(raw)?),
        }
    }

    /// Writes that replace the stored session with `session`.
    ///
    /// Any cookie of the family present in `previous` that the new value
    /// does not overwrite is removed, so a shrinking session leaves no
    /// stale chunks behind.
    pub fn store(
        &self,
        session: &StoredSession,
        previous: &RequestCookies,
    ) -> Result<Vec<CookieMutation>, CodecError> {
        let encoded = self.encode(session)?;
        let mut written = Vec::new();
        let mut mutations = Vec::new();

        if encoded.len() <= MAX_CHUNK_SIZE {
            written.push(self.name.clone());
            mutations.push(CookieMutation::set(
                self.name.clone(),
                encoded,
                self.options.clone(),
            ));
        } else {
            // Base64 output is ASCII, so byte offsets are char boundaries.
            for (index, chunk) in encoded.as_bytes().chunks(MAX_CHUNK_SIZE).enumerate() {
                let name = self.chunk_name(index);
                written.push(name.clone());
                mutations.push(CookieMutation::set(
                    name,
                    String::from_utf8_lossy(chunk).into_owned(),
                    self.options.clone(),
                ));
            }
        }

        mutations.extend(
            self.present_names(previous)
                .into_iter()
                .filter(|name| !written.contains(name))
                .map(|name| CookieMutation::remove(name, &self.options)),
        );
        Ok(mutations)
    }

    /// Writes that remove every session cookie present in `previous`.
    pub fn clear(&self, previous: &RequestCookies) -> Vec<CookieMutation> {
        self.present_names(previous)
            .into_iter()
            .map(|name| CookieMutation::remove(name, &self.options))
            .collect()
    }

    /// Short-lived cookie holding the PKCE verifier between sign-in and callback.
    pub fn verifier_cookie(&self, verifier: &str) -> CookieMutation {
        CookieMutation::set(
            self.verifier_cookie_name(),
            verifier,
            CookieOptions {
                max_age_seconds: Some(VERIFIER_MAX_AGE_SECONDS),
                http_only: true,
                ..self.options.clone()
            },
        )
    }

    pub fn load_verifier<'a>(&self, cookies: &'a RequestCookies) -> Option<&'a str> {
        cookies
            .get(&self.verifier_cookie_name())
            .filter(|v| !v.is_empty())
    }

    pub fn clear_verifier(&self) -> CookieMutation {
        CookieMutation::remove(self.verifier_cookie_name(), &self.options)
    }

    fn chunk_name(&self, index: usize) -> String {
        format!("{}.{index}", self.name)
    }

    /// Names of the base cookie and its chunks present in `cookies`, in header order.
    fn present_names(&self, cookies: &RequestCookies) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (name, _) in cookies.read_all() {
            let is_family = name == &self.name
                || name
                    .strip_prefix(self.name.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .is_some_and(|index| index.parse::<usize>().is_ok());
            if is_family && !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}
