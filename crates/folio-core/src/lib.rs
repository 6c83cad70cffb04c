//! # folio-core
//!
//! Core crate for Folio. Contains configuration schemas, the unified
//! error system, and the storage trait implemented by `folio-storage`.
//!
//! This crate has **no** internal dependencies on other Folio crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
