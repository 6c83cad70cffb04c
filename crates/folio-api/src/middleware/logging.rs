//! Access log.

use std::time::Instant;

use axum::extract::Request;
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use folio_auth::Surface;

use super::gate::GateTrace;

/// One line per request with the gate's verdict.
///
/// Gated paths carry the surface and decision recorded by
/// [`super::gate::admin_gate`]; everything else logs as a `bypass`. The
/// number of `Set-Cookie` headers is logged so refreshes are visible
/// without logging cookie values. Server errors log at `warn`.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();
    let (surface, gate) = gate_fields(response.extensions().get::<GateTrace>());
    let cookies_written = response.headers().get_all(SET_COOKIE).iter().count();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            surface,
            gate,
            duration_ms = %elapsed.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            surface,
            gate,
            cookies_written,
            duration_ms = %elapsed.as_millis(),
            "Request served"
        );
    }

    response
}

fn gate_fields(trace: Option<&GateTrace>) -> (&'static str, &'static str) {
    match trace {
        None => ("public", "bypass"),
        Some(trace) => {
            let surface = match trace.surface {
                Surface::Browser => "browser",
                Surface::Api => "api",
            };
            (surface, trace.decision)
        }
    }
}
