//! Project listing and admin CRUD handlers.
//!
//! A zero-row update is deliberately not a silent success: an update
//! naming an id that matches no row is a `404`. Deleting an unknown id
//! still answers `{"ok":true}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use tracing::{debug, info, warn};

use folio_core::error::AppError;

use crate::dto::request::{DeleteProjectParams, ProjectIdInput, UpsertProjectRequest};
use crate::dto::response::{OkResponse, ProjectListResponse};
use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/projects
pub async fn list_published(
    State(state): State<AppState>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let projects = state.projects.list_published().await?;
    Ok(Json(ProjectListResponse { projects }))
}

/// GET /api/admin/projects
pub async fn list_all(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let projects = state.projects.list_all().await?;
    Ok(Json(ProjectListResponse { projects }))
}

/// POST /api/admin/projects
///
/// `id: null` inserts. Any other id updates and must match a row.
pub async fn upsert(
    State(state): State<AppState>,
    admin: AdminUser,
    body: Result<Json<UpsertProjectRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let Json(request) = body?;

    match request.id {
        None => {
            let new_project = request.payload.into_new_project()?;
            let project = state.projects.insert(&new_project).await?;
            info!(user_id = %admin.user_id, project_id = project.id, "Project created");
        }
        Some(id) => {
            let id = id.to_id()?;
            let patch = request.payload.into_patch()?;
            state
                .projects
                .update(id, &patch)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))?;
            info!(user_id = %admin.user_id, project_id = id, "Project updated");
        }
    }

    Ok(Json(OkResponse::ok()))
}

/// DELETE /api/admin/projects?id=..&image_path=..
///
/// The image is removed after the row, best effort: a storage failure is
/// logged and does not fail the request.
pub async fn delete(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(params): Query<DeleteProjectParams>,
) -> Result<Json<OkResponse>, ApiError> {
    let raw_id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("missing id"))?;
    let id = ProjectIdInput::Text(raw_id).to_id()?;

    let removed = state.projects.delete(id).await?;
    if removed {
        info!(user_id = %admin.user_id, project_id = id, "Project deleted");
    } else {
        debug!(project_id = id, "Delete matched no project");
    }

    if let Some(path) = params.image_path.filter(|p| !p.is_empty()) {
        if let Err(e) = state.images.remove(admin.access_token(), &[path.clone()]).await {
            warn!(project_id = id, path = %path, error = %e, "Project image cleanup failed");
        }
    }

    Ok(Json(OkResponse::ok()))
}
