//! Admin gate behavior through the full router.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;

use folio_api::middleware::gate::GateTrace;
use folio_auth::{
    BackendError, CookieMutation, CookieOptions, Identity, IdentityResolver, Resolution,
    ResolveError, SessionCookies, Surface,
};
use helpers::{COOKIE_NAME, FakeAuthBackend, TestApp, session, test_config, user};

// ── Scenarios ────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_page_without_session_redirects_to_login() {
    let app = TestApp::new();

    let res = app.get("/admin/projects", None).await;

    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location(), Some("/login"));
    assert_eq!(app.backend.resolution_calls(), 0);
    assert_eq!(app.profiles.call_count(), 0);
    assert_eq!(
        res.gate,
        Some(GateTrace {
            surface: Surface::Browser,
            decision: "unauthenticated",
        })
    );
}

#[tokio::test]
async fn test_admin_page_for_non_admin_redirects_to_landing() {
    let app = TestApp::new();
    let cookie = app.signed_in(2, false);

    let res = app.get("/admin", Some(&cookie)).await;

    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location(), Some("/"));
    assert_eq!(app.profiles.call_count(), 1);
}

#[tokio::test]
async fn test_admin_page_for_admin_passes_through() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app.get("/admin", Some(&cookie)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.text.contains("Signed in as user1@example.com"));
    assert!(res.set_cookies().is_empty());
    assert_eq!(res.gate.map(|g| g.decision), Some("allowed"));
}

#[tokio::test]
async fn test_quoted_session_cookie_is_accepted() {
    let app = TestApp::new();
    app.backend.accept_token("token-1", user(1));
    app.profiles.set_admin(1, true);
    let value = app.codec.encode(&session("token-1", 3600)).unwrap();

    let res = app
        .get("/admin", Some(&format!("theme=dark; {COOKIE_NAME}=\"{value}\"")))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.backend.get_user_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_admin_page_relays_refreshed_session() {
    let app = TestApp::new();
    let stale = session("stale", 10);
    let fresh = session("fresh", 3600);
    app.backend.refresh_to("refresh-stale", Ok(fresh.clone()));
    app.backend.accept_token("fresh", user(1));
    app.profiles.set_admin(1, true);

    let res = app.get("/admin", Some(&app.session_cookie(&stale))).await;

    assert_eq!(res.status, StatusCode::OK);
    let written = res.set_cookies_named(COOKIE_NAME);
    assert_eq!(written.len(), 1);
    let expected = app.codec.encode(&fresh).unwrap();
    assert!(written[0].starts_with(&format!("{COOKIE_NAME}={expected}")));
    assert_eq!(app.backend.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_api_with_expired_session_returns_unauthorized() {
    let app = TestApp::new();
    app.profiles.set_admin(1, true);

    let res = app
        .get("/api/admin/projects", Some(&app.session_cookie(&session("old", -30))))
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, json!({ "error": "unauthorized" }));
    assert_eq!(app.profiles.call_count(), 0);

    // The rejected refresh token is cleared from the browser.
    let cleared = res.set_cookies_named(COOKIE_NAME);
    assert_eq!(cleared.len(), 1);
    assert!(cleared[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_api_with_failed_profile_lookup_returns_forbidden() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);
    app.profiles.break_lookups();

    let res = app.get("/api/admin/projects", Some(&cookie)).await;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, json!({ "error": "forbidden" }));
    assert_eq!(
        res.gate,
        Some(GateTrace {
            surface: Surface::Api,
            decision: "forbidden",
        })
    );
}

// ── Denial shapes ────────────────────────────────────────────

#[tokio::test]
async fn test_api_without_session_returns_unauthorized_json() {
    let app = TestApp::new();

    let res = app
        .request("POST", "/api/admin/projects", Some(json!({ "id": null })), None)
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, json!({ "error": "unauthorized" }));
    assert!(app.projects.rows().is_empty());
}

#[tokio::test]
async fn test_api_for_non_admin_returns_forbidden() {
    let app = TestApp::new();
    let cookie = app.signed_in(3, false);

    let res = app
        .request("DELETE", "/api/admin/project-image", Some(json!({ "path": "a.png" })), Some(&cookie))
        .await;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, json!({ "error": "forbidden" }));
}

#[tokio::test]
async fn test_user_without_profile_row_is_forbidden() {
    let app = TestApp::new();
    app.backend.accept_token("orphan", user(9));

    let res = app
        .get("/admin", Some(&app.session_cookie(&session("orphan", 3600))))
        .await;

    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location(), Some("/"));
}

#[tokio::test]
async fn test_revoked_token_is_unauthenticated() {
    let app = TestApp::new();
    app.profiles.set_admin(1, true);

    let res = app
        .get("/admin", Some(&app.session_cookie(&session("revoked", 3600))))
        .await;

    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location(), Some("/login"));
    assert_eq!(app.profiles.call_count(), 0);
}

#[tokio::test]
async fn test_backend_outage_is_forbidden_not_server_error() {
    let app = TestApp::new();
    app.backend
        .fail_token("token-1", BackendError::Transport("connection refused".into()));
    app.profiles.set_admin(1, true);

    let res = app
        .get("/api/admin/projects", Some(&app.session_cookie(&session("token-1", 3600))))
        .await;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, json!({ "error": "forbidden" }));
    assert_eq!(app.profiles.call_count(), 0);
}

#[tokio::test]
async fn test_garbled_session_cookie_is_unauthenticated() {
    let app = TestApp::new();

    let res = app
        .get("/admin", Some(&format!("{COOKIE_NAME}=base64-%%%not-base64")))
        .await;

    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location(), Some("/login"));
    assert_eq!(app.backend.resolution_calls(), 0);
}

// ── Bypass ───────────────────────────────────────────────────

#[tokio::test]
async fn test_public_paths_never_touch_auth_backend() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    for path in ["/", "/login", "/api/projects", "/api/health", "/administrator", "/api/adminx"] {
        let res = app.get(path, Some(&cookie)).await;
        assert_ne!(res.status, StatusCode::UNAUTHORIZED, "{path}");
        assert_ne!(res.status, StatusCode::FORBIDDEN, "{path}");
        assert!(res.set_cookies().is_empty(), "{path}");
        assert_eq!(res.gate, None, "{path}");
    }

    assert_eq!(app.backend.resolution_calls(), 0);
    assert_eq!(app.profiles.call_count(), 0);
}

#[tokio::test]
async fn test_public_listing_with_stale_session_does_not_refresh() {
    let app = TestApp::new();
    app.backend.refresh_to("refresh-stale", Ok(session("fresh", 3600)));

    let res = app
        .get("/api/projects", Some(&app.session_cookie(&session("stale", -5))))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "projects": [] }));
    assert_eq!(app.backend.refresh_calls.load(Ordering::SeqCst), 0);
}

// ── Relay on denial ──────────────────────────────────────────

#[tokio::test]
async fn test_refreshed_session_relayed_on_forbidden() {
    let app = TestApp::new();
    let fresh = session("fresh", 3600);
    app.backend.refresh_to("refresh-stale", Ok(fresh));
    app.backend.accept_token("fresh", user(1));
    app.profiles.break_lookups();

    let res = app
        .get("/api/admin/projects", Some(&app.session_cookie(&session("stale", 5))))
        .await;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let written = res.set_cookies_named(COOKIE_NAME);
    assert_eq!(written.len(), 1);
    assert!(!written[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_refreshed_session_relayed_on_landing_redirect() {
    let app = TestApp::new();
    app.backend.refresh_to("refresh-stale", Ok(session("fresh", 3600)));
    app.backend.accept_token("fresh", user(4));
    app.profiles.set_admin(4, false);

    let res = app
        .get("/admin", Some(&app.session_cookie(&session("stale", 5))))
        .await;

    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location(), Some("/"));
    assert_eq!(res.set_cookies_named(COOKIE_NAME).len(), 1);
}

/// Resolver that always writes the same cookie twice before denying.
struct RewritingResolver;

#[async_trait]
impl IdentityResolver for RewritingResolver {
    async fn resolve(&self, _cookies: SessionCookies) -> Resolution {
        let options = CookieOptions {
            path: Some("/".into()),
            ..Default::default()
        };
        Resolution {
            outcome: Err(ResolveError::Unauthenticated),
            mutations: vec![
                CookieMutation::set("marker", "first", options.clone()),
                CookieMutation::set("marker", "second", options),
            ],
        }
    }
}

#[tokio::test]
async fn test_duplicate_writes_collapse_to_latest() {
    let backend = Arc::new(FakeAuthBackend::default());
    let app = TestApp::with_resolver(test_config(), backend, Arc::new(RewritingResolver));

    let res = app.get("/admin", None).await;

    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    let written = res.set_cookies_named("marker");
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("marker=second"));
}

/// Resolver that grants a fixed identity.
struct FixedResolver(u128);

#[async_trait]
impl IdentityResolver for FixedResolver {
    async fn resolve(&self, _cookies: SessionCookies) -> Resolution {
        Resolution {
            outcome: Ok(Identity::new(
                uuid::Uuid::from_u128(self.0),
                None,
                "fixed-token".to_string(),
            )),
            mutations: Vec::new(),
        }
    }
}

#[tokio::test]
async fn test_policy_decides_for_any_resolver() {
    let backend = Arc::new(FakeAuthBackend::default());
    let app = TestApp::with_resolver(test_config(), backend, Arc::new(FixedResolver(7)));

    let res = app.get("/api/admin/projects", None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    app.profiles.set_admin(7, true);
    let res = app.get("/api/admin/projects", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.profiles.call_count(), 2);
}
