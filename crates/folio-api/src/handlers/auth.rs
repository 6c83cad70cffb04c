//! OAuth sign-in, callback, and sign-out.
//!
//! These routes sit outside the gate. They write session cookies directly
//! through the same codec the gate reads them with.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{info, warn};

use folio_auth::{AuthorizeRequest, CookieMutation, RequestCookies, pkce, relay};

use crate::dto::request::CallbackParams;
use crate::state::AppState;

/// Where a completed sign-in lands.
const ADMIN_HOME: &str = "/admin";

fn redirect_with(location: &str, mutations: &[CookieMutation]) -> Response {
    relay::apply(Redirect::to(location).into_response(), mutations)
}

fn oauth_failure(state: &AppState) -> Response {
    let location = format!("{}?error=oauth", state.config.gate.sign_in_path);
    redirect_with(&location, &[state.session_codec.clear_verifier()])
}

/// GET /auth/signin
pub async fn sign_in(State(state): State<AppState>) -> Response {
    let verifier = pkce::generate_code_verifier();
    let challenge = pkce::code_challenge(&verifier);
    let redirect_to = format!(
        "{}/auth/callback",
        state.config.server.public_url.trim_end_matches('/')
    );

    let url = state.auth_backend.authorize_url(AuthorizeRequest {
        provider: &state.config.auth.oauth_provider,
        redirect_to: &redirect_to,
        scopes: &state.config.auth.oauth_scopes,
        code_challenge: &challenge,
    });

    redirect_with(&url, &[state.session_codec.verifier_cookie(&verifier)])
}

/// GET /auth/callback?code=..
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> Response {
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Redirect::to(ADMIN_HOME).into_response();
    };

    let cookies = RequestCookies::from_headers(&headers);
    let codec = &state.session_codec;
    let Some(verifier) = codec.load_verifier(&cookies) else {
        warn!("OAuth callback without a code verifier");
        return oauth_failure(&state);
    };

    let session = match state.auth_backend.exchange_code(&code, verifier).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "Code exchange failed");
            return oauth_failure(&state);
        }
    };

    let mut mutations = match codec.store(&session, &cookies) {
        Ok(mutations) => mutations,
        Err(e) => {
            warn!(error = %e, "Failed to encode new session");
            return oauth_failure(&state);
        }
    };
    mutations.push(codec.clear_verifier());

    info!(expires_at = ?session.expires_at, "Signed in");
    redirect_with(ADMIN_HOME, &mutations)
}

/// GET|POST /auth/signout
///
/// Revocation is best effort; the session cookies are cleared regardless.
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookies = RequestCookies::from_headers(&headers);
    let codec = &state.session_codec;

    if let Ok(Some(session)) = codec.load(&cookies) {
        match state.auth_backend.sign_out(&session.access_token).await {
            Ok(()) => info!("Signed out"),
            Err(e) => warn!(error = %e, "Backend sign-out failed"),
        }
    }

    redirect_with(&state.config.gate.sign_in_path, &codec.clear(&cookies))
}
