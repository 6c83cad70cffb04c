//! Project repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_entity::project::{NewProject, Project, ProjectId, ProjectPatch};

const ORDER_BY: &str = " ORDER BY sort_order ASC, created_at DESC";

/// Storage seam for project rows, so handlers can run against Postgres or
/// an in-memory store.
#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// Every project, ordered by `sort_order` then newest first.
    async fn list_all(&self) -> AppResult<Vec<Project>>;

    /// Published projects only, same ordering.
    async fn list_published(&self) -> AppResult<Vec<Project>>;

    /// Insert a project and return the stored row.
    async fn insert(&self, project: &NewProject) -> AppResult<Project>;

    /// Apply a partial update. `None` when no row has this id.
    async fn update(&self, id: ProjectId, patch: &ProjectPatch) -> AppResult<Option<Project>>;

    /// Delete a project. Returns `true` if a row was removed.
    async fn delete(&self, id: ProjectId) -> AppResult<bool>;
}

/// Repository for `projects`.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a project by primary key.
    pub async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find project", e))
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn list_all(&self) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>(&format!("SELECT * FROM projects{ORDER_BY}"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list projects", e))
    }

    async fn list_published(&self) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT * FROM projects WHERE is_published = true{ORDER_BY}"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list published projects", e)
        })
    }

    async fn insert(&self, project: &NewProject) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, description, is_published, sort_order, tags,
                live_url, repo_url, image_url, image_name, image_path
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.is_published)
        .bind(project.sort_order)
        .bind(&project.tags)
        .bind(&project.live_url)
        .bind(&project.repo_url)
        .bind(&project.image_url)
        .bind(&project.image_name)
        .bind(&project.image_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert project", e))
    }

    async fn update(&self, id: ProjectId, patch: &ProjectPatch) -> AppResult<Option<Project>> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE projects SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(v) = &patch.title {
                set.push("title = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.description {
                set.push("description = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = patch.is_published {
                set.push("is_published = ").push_bind_unseparated(v);
            }
            if let Some(v) = patch.sort_order {
                set.push("sort_order = ").push_bind_unseparated(v);
            }
            if let Some(v) = &patch.tags {
                set.push("tags = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.live_url {
                set.push("live_url = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.repo_url {
                set.push("repo_url = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.image_url {
                set.push("image_url = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.image_name {
                set.push("image_name = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.image_path {
                set.push("image_path = ").push_bind_unseparated(v.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Project>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update project", e))
    }

    async fn delete(&self, id: ProjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete project", e))?;

        Ok(result.rows_affected() > 0)
    }
}
