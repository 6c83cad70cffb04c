//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Primary key of `projects`.
pub type ProjectId = i64;

/// A portfolio project as stored in `projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Whether the project appears on the public listing.
    pub is_published: bool,
    /// Ascending display order.
    pub sort_order: i32,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Link to the running project.
    pub live_url: Option<String>,
    /// Link to the source repository.
    pub repo_url: Option<String>,
    /// External image URL.
    pub image_url: Option<String>,
    /// Original file name of the uploaded image.
    pub image_name: Option<String>,
    /// Object path of the uploaded image within the image bucket.
    pub image_path: Option<String>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub is_published: bool,
    pub sort_order: i32,
    pub tags: Vec<String>,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
    pub image_url: Option<String>,
    pub image_name: Option<String>,
    pub image_path: Option<String>,
}

/// A partial update. `None` leaves a column untouched; for nullable columns
/// `Some(None)` sets the column to `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub live_url: Option<Option<String>>,
    pub repo_url: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub image_name: Option<Option<String>>,
    pub image_path: Option<Option<String>>,
}

impl ProjectPatch {
    /// True when the patch would not change any column.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.is_published.is_none()
            && self.sort_order.is_none()
            && self.tags.is_none()
            && self.live_url.is_none()
            && self.repo_url.is_none()
            && self.image_url.is_none()
            && self.image_name.is_none()
            && self.image_path.is_none()
    }

    /// Apply the patch to an in-memory row.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(v) = &self.title {
            project.title = v.clone();
        }
        if let Some(v) = &self.description {
            project.description = v.clone();
        }
        if let Some(v) = self.is_published {
            project.is_published = v;
        }
        if let Some(v) = self.sort_order {
            project.sort_order = v;
        }
        if let Some(v) = &self.tags {
            project.tags = v.clone();
        }
        if let Some(v) = &self.live_url {
            project.live_url = v.clone();
        }
        if let Some(v) = &self.repo_url {
            project.repo_url = v.clone();
        }
        if let Some(v) = &self.image_url {
            project.image_url = v.clone();
        }
        if let Some(v) = &self.image_name {
            project.image_name = v.clone();
        }
        if let Some(v) = &self.image_path {
            project.image_path = v.clone();
        }
    }
}
