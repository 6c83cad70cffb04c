//! Admin gate middleware.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use folio_auth::{AuthorizationDecision, SessionCookies, Surface, relay};

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// What the gate did with a request, left in the response extensions for
/// the access log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTrace {
    pub surface: Surface,
    pub decision: &'static str,
}

/// Guards the protected prefixes.
///
/// Paths outside them pass straight through without touching the auth
/// backend. For protected paths the gate's decision either forwards the
/// request with the [`folio_auth::Identity`] in its extensions or produces
/// a denial; in every case the decision's cookie writes are relayed onto
/// the final response.
pub async fn admin_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(surface) = state.protected.classify(request.uri().path()) else {
        return next.run(request).await;
    };

    let cookies = SessionCookies::from_headers(request.headers());
    let decision = state.gate.evaluate(cookies).await;
    let trace = GateTrace {
        surface,
        decision: decision.label(),
    };
    debug!(
        path = %request.uri().path(),
        surface = ?surface,
        decision = trace.decision,
        pending_cookies = decision.mutations().len(),
        "Gate decision"
    );

    let (response, mutations) = match decision {
        AuthorizationDecision::Allowed {
            identity,
            mutations,
        } => {
            request.extensions_mut().insert(identity);
            (next.run(request).await, mutations)
        }
        AuthorizationDecision::DeniedUnauthenticated { mutations } => {
            let response = match surface {
                Surface::Browser => {
                    Redirect::temporary(&state.config.gate.sign_in_path).into_response()
                }
                Surface::Api => {
                    (StatusCode::UNAUTHORIZED, Json(ApiErrorResponse::unauthorized())).into_response()
                }
            };
            (response, mutations)
        }
        AuthorizationDecision::DeniedForbidden { mutations } => {
            let response = match surface {
                Surface::Browser => {
                    Redirect::temporary(&state.config.gate.landing_path).into_response()
                }
                Surface::Api => {
                    (StatusCode::FORBIDDEN, Json(ApiErrorResponse::forbidden())).into_response()
                }
            };
            (response, mutations)
        }
    };

    let mut response = relay::apply(response, &mutations);
    response.extensions_mut().insert(trace);
    response
}
