//! Project image upload and removal.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use folio_core::error::AppError;
use folio_core::traits::storage::ObjectUpload;

use crate::dto::request::DeleteImageRequest;
use crate::dto::response::{OkResponse, UploadResponse};
use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::state::AppState;

const DEFAULT_EXTENSION: &str = "bin";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// POST /api/admin/project-image (multipart field `file`)
pub async fn upload(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|_| AppError::validation("missing file"))?;

    let mut file: Option<(Option<String>, Option<String>, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        file = Some((file_name, content_type, data));
        break;
    }

    let (file_name, content_type, data) = file.ok_or_else(|| AppError::validation("missing file"))?;
    let path = format!("{}.{}", Uuid::new_v4(), extension_of(file_name.as_deref()));
    let size = data.len();

    let stored = state
        .images
        .upload(
            admin.access_token(),
            ObjectUpload {
                path,
                data,
                content_type: content_type
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            },
        )
        .await?;

    info!(user_id = %admin.user_id, path = %stored, size, "Project image uploaded");
    Ok(Json(UploadResponse { path: stored }))
}

/// DELETE /api/admin/project-image `{"path": ".."}`
pub async fn remove(
    State(state): State<AppState>,
    admin: AdminUser,
    body: Result<Json<DeleteImageRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let path = body
        .ok()
        .and_then(|Json(req)| req.path)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::validation("missing path"))?;

    state.images.remove(admin.access_token(), &[path.clone()]).await?;
    info!(user_id = %admin.user_id, path = %path, "Project image removed");
    Ok(Json(OkResponse::ok()))
}

/// Lowercased extension of the uploaded file name, `bin` when there is none
/// or it is not plain alphanumeric.
fn extension_of(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 16 && ext.bytes().all(|b| b.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
