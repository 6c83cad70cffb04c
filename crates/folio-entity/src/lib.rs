//! # folio-entity
//!
//! Domain entity models for Folio. Every struct in this crate represents a
//! database table row or the data needed to write one. Row types derive
//! `sqlx::FromRow`.

pub mod profile;
pub mod project;
