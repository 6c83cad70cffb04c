//! `reqwest` client for a GoTrue-compatible auth API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use folio_core::config::AuthConfig;
use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;

use super::{AuthBackend, AuthorizeRequest, BackendError, BackendUser};
use crate::session::StoredSession;

/// Error body shapes used by the auth API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// Auth API client bound to one backend project.
#[derive(Debug, Clone)]
pub struct GoTrueClient {
    http: Client,
    base_url: Url,
    publishable_key: String,
}

impl GoTrueClient {
    pub fn new(backend_url: &str, publishable_key: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(backend_url).map_err(|e| {
            AppError::configuration(format!("Invalid backend URL '{backend_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration("Backend URL cannot be a base"));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "HTTP client", e))?;

        Ok(Self {
            http,
            base_url,
            publishable_key: publishable_key.to_string(),
        })
    }

    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        Self::new(
            &config.backend_url,
            &config.publishable_key,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["auth", "v1"])
                .extend(path.split('/'));
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<StoredSession, BackendError> {
        let url = self.endpoint("token", &[("grant_type", grant_type)]);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.publishable_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let mut session: StoredSession = read_json(response, grant_type).await?;
        if session.expires_at.is_none() {
            session.expires_at = session
                .expires_in
                .map(|secs| Utc::now().timestamp().saturating_add(secs));
        }
        debug!(grant_type, expires_at = ?session.expires_at, "Session issued");
        Ok(session)
    }
}

fn transport(err: reqwest::Error) -> BackendError {
    warn!(error = %err, "Auth backend request failed");
    BackendError::Transport(err.to_string())
}

async fn read_json<T: DeserializeOwned>(response: Response, action: &str) -> Result<T, BackendError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()));
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .unwrap_or_default()
        .into_message()
        .unwrap_or_else(|| status.to_string());

    if status.is_client_error() {
        debug!(status = status.as_u16(), action, message = %message, "Auth backend rejected request");
        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    } else {
        warn!(status = status.as_u16(), action, message = %message, "Auth backend error");
        Err(BackendError::Transport(format!("{status}: {message}")))
    }
}

#[async_trait]
impl AuthBackend for GoTrueClient {
    async fn get_user(&self, access_token: &str) -> Result<BackendUser, BackendError> {
        let response = self
            .http
            .get(self.endpoint("user", &[]))
            .header("apikey", &self.publishable_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;
        read_json(response, "user").await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<StoredSession, BackendError> {
        self.token_grant(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<StoredSession, BackendError> {
        self.token_grant(
            "pkce",
            serde_json::json!({ "auth_code": auth_code, "code_verifier": code_verifier }),
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.endpoint("logout", &[]))
            .header("apikey", &self.publishable_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        read_json::<serde_json::Value>(response, "logout")
            .await
            .map(|_| ())
    }

    fn authorize_url(&self, request: AuthorizeRequest<'_>) -> String {
        self.endpoint(
            "authorize",
            &[
                ("provider", request.provider),
                ("redirect_to", request.redirect_to),
                ("scopes", request.scopes),
                ("code_challenge", request.code_challenge),
                ("code_challenge_method", "s256"),
            ],
        )
        .to_string()
    }
}
