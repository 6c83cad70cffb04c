//! Portfolio project entities.

pub mod model;

pub use model::{NewProject, Project, ProjectId, ProjectPatch};
