//! Repository implementations backed by PostgreSQL.

pub mod profile;
pub mod project;

pub use profile::ProfileRepository;
pub use project::{ProjectRepository, ProjectStore};
