//! Request DTOs with validation.
//!
//! Strings are trimmed before validation. Unknown fields are rejected.

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

use folio_core::error::AppError;
use folio_entity::project::{NewProject, ProjectId, ProjectPatch};

use crate::error::ApiError;

const MAX_TAG_LEN: usize = 40;

/// Project fields accepted from the admin API.
///
/// Every field is optional at this level; [`ProjectPayload::into_new_project`]
/// enforces the fields an insert needs and [`ProjectPayload::into_patch`]
/// rejects an empty update. Nullable columns distinguish an absent key
/// (leave as is) from an explicit `null` (clear).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProjectPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_published: Option<bool>,

    #[serde(default)]
    #[validate(range(min = 0, max = 100_000, message = "sort_order must be 0-100000"))]
    pub sort_order: Option<i32>,

    #[serde(default)]
    #[validate(length(max = 25, message = "Too many tags"))]
    pub tags: Option<Vec<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "Must be a valid URL"))]
    pub live_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "Must be a valid URL"))]
    pub repo_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "Must be a valid URL"))]
    pub image_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(min = 1, max = 255, message = "image_name must be 1-255 characters"))]
    pub image_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(min = 1, max = 500, message = "image_path must be 1-500 characters"))]
    pub image_path: Option<Option<String>>,
}

/// Present-but-null becomes `Some(None)`; absence is handled by `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

impl ProjectPayload {
    fn trimmed(mut self) -> Self {
        for field in [&mut self.title, &mut self.description].into_iter().flatten() {
            trim(field);
        }
        for field in [
            &mut self.live_url,
            &mut self.repo_url,
            &mut self.image_url,
            &mut self.image_name,
            &mut self.image_path,
        ]
        .into_iter()
        .flatten()
        .flatten()
        {
            trim(field);
        }
        if let Some(tags) = &mut self.tags {
            tags.iter_mut().for_each(trim);
        }
        self
    }

    /// Trim and validate, collecting every field error.
    fn checked(self) -> Result<Self, ApiError> {
        let payload = self.trimmed();
        let mut errors = payload.validate().err().unwrap_or_else(ValidationErrors::new);

        if let Some(tags) = &payload.tags {
            if tags.iter().any(|t| t.is_empty() || t.chars().count() > MAX_TAG_LEN) {
                errors.add(
                    "tags",
                    ValidationError::new("tag_length")
                        .with_message("Tags must be 1-40 characters".into()),
                );
            }
        }

        if errors.errors().is_empty() {
            Ok(payload)
        } else {
            Err(invalid(errors))
        }
    }

    /// Validate as a full insert. Title and description are required.
    pub fn into_new_project(self) -> Result<NewProject, ApiError> {
        let payload = self.checked()?;

        let mut missing = ValidationErrors::new();
        if payload.title.is_none() {
            missing.add("title", ValidationError::new("required").with_message("Title is required".into()));
        }
        if payload.description.is_none() {
            missing.add(
                "description",
                ValidationError::new("required").with_message("Description is required".into()),
            );
        }
        if !missing.errors().is_empty() {
            return Err(invalid(missing));
        }

        Ok(NewProject {
            title: payload.title.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            is_published: payload.is_published.unwrap_or(false),
            sort_order: payload.sort_order.unwrap_or(0),
            tags: payload.tags.unwrap_or_default(),
            live_url: payload.live_url.flatten(),
            repo_url: payload.repo_url.flatten(),
            image_url: payload.image_url.flatten(),
            image_name: payload.image_name.flatten(),
            image_path: payload.image_path.flatten(),
        })
    }

    /// Validate as a partial update carrying at least one field.
    pub fn into_patch(self) -> Result<ProjectPatch, ApiError> {
        let payload = self.checked()?;
        let patch = ProjectPatch {
            title: payload.title,
            description: payload.description,
            is_published: payload.is_published,
            sort_order: payload.sort_order,
            tags: payload.tags,
            live_url: payload.live_url,
            repo_url: payload.repo_url,
            image_url: payload.image_url,
            image_name: payload.image_name,
            image_path: payload.image_path,
        };
        if patch.is_empty() {
            return Err(AppError::validation("At least one field must be provided").into());
        }
        Ok(patch)
    }
}

fn invalid(errors: ValidationErrors) -> ApiError {
    let details = serde_json::to_value(&errors).unwrap_or(serde_json::Value::Null);
    ApiError::with_details(AppError::validation("Invalid project payload"), details)
}

/// A project id given either as a JSON number or a digit string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProjectIdInput {
    Number(i64),
    Text(String),
}

impl ProjectIdInput {
    /// Parse into a positive id.
    pub fn to_id(&self) -> Result<ProjectId, AppError> {
        let id = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse::<ProjectId>().ok()
            }
            Self::Text(_) => None,
        };
        id.filter(|id| *id > 0)
            .ok_or_else(|| AppError::validation("id must be a positive integer"))
    }
}

/// `POST /api/admin/projects`: `id: null` inserts, any other id updates.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertProjectRequest {
    #[serde(default)]
    pub id: Option<ProjectIdInput>,
    #[serde(default)]
    pub payload: ProjectPayload,
}

/// `DELETE /api/admin/projects?id=..&image_path=..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteProjectParams {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// `DELETE /api/admin/project-image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteImageRequest {
    #[serde(default)]
    pub path: Option<String>,
}

/// `GET /auth/callback?code=..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
}

/// `GET /login?error=..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginParams {
    #[serde(default)]
    pub error: Option<String>,
}
