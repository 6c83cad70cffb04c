//! # folio-database
//!
//! PostgreSQL access for Folio: connection pool management and the
//! repositories for `profiles` and `projects`.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
