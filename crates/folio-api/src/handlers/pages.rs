//! Minimal server-rendered pages.

use std::fmt::Write;

use axum::extract::{Query, State};
use axum::response::Html;

use folio_entity::project::Project;

use crate::dto::request::LoginParams;
use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::state::AppState;

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{body}</body></html>\n",
        escape(title)
    ))
}

fn project_list(projects: &[Project], show_status: bool) -> String {
    if projects.is_empty() {
        return "<p>No projects yet.</p>\n".to_string();
    }
    let mut out = String::from("<ul>\n");
    for p in projects {
        let _ = write!(out, "<li><strong>{}</strong>", escape(&p.title));
        if show_status && !p.is_published {
            out.push_str(" (draft)");
        }
        let _ = write!(out, "<p>{}</p>", escape(&p.description));
        if let Some(url) = &p.live_url {
            let _ = write!(out, "<a href=\"{}\">Live</a> ", escape(url));
        }
        if let Some(url) = &p.repo_url {
            let _ = write!(out, "<a href=\"{}\">Source</a>", escape(url));
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
    out
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let projects = state.projects.list_published().await?;
    Ok(page(
        "Projects",
        &format!("<h1>Projects</h1>\n{}", project_list(&projects, false)),
    ))
}

/// GET /login
pub async fn login(Query(params): Query<LoginParams>) -> Html<String> {
    let notice = match params.error.as_deref() {
        Some("oauth") => "<p role=\"alert\">Sign-in failed. Please try again.</p>\n",
        _ => "",
    };
    page(
        "Sign in",
        &format!("<h1>Sign in</h1>\n{notice}<a href=\"/auth/signin\">Continue with GitHub</a>\n"),
    )
}

/// GET /admin
pub async fn admin_home(admin: AdminUser) -> Html<String> {
    let who = admin.email.as_deref().map(escape).unwrap_or_default();
    page(
        "Admin",
        &format!(
            "<h1>Admin</h1>\n<p>Signed in as {who}</p>\n<a href=\"/admin/projects\">Projects</a>\n\
             <form method=\"post\" action=\"/auth/signout\"><button>Sign out</button></form>\n"
        ),
    )
}

/// GET /admin/projects
pub async fn admin_projects(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Html<String>, ApiError> {
    let projects = state.projects.list_all().await?;
    Ok(page(
        "Manage projects",
        &format!("<h1>Manage projects</h1>\n{}", project_list(&projects, true)),
    ))
}
