//! # folio-storage
//!
//! Object storage providers for project images: the hosted bucket that
//! lives next to the auth backend, and an in-memory provider for local
//! development and tests.

pub mod providers;

pub use providers::{BackendStorage, MemoryStorage, build_provider};
