//! Database configuration.

use serde::{Deserialize, Serialize};

/// How the server reaches the hosted Postgres instance.
///
/// A transaction-mode pooler hands each transaction to an arbitrary
/// backend connection, so named prepared statements cannot be reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolerMode {
    /// Direct connection to the database.
    #[default]
    Direct,
    /// Session-mode pooler: one backend connection per client session.
    Session,
    /// Transaction-mode pooler.
    Transaction,
}

/// Connection pool settings. The defaults stay small because the hosted
/// pooler already multiplexes connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    #[serde(default)]
    pub pooler: PoolerMode,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub min_connections: u32,
    /// Seconds to wait for a free connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// Seconds before an idle connection is closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Seconds before any connection is recycled.
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_seconds: u64,
    /// Reported as `application_name` in `pg_stat_activity`.
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

impl DatabaseConfig {
    /// Prepared statements cached per connection; zero behind a
    /// transaction-mode pooler.
    pub fn statement_cache_capacity(&self) -> usize {
        match self.pooler {
            PoolerMode::Transaction => 0,
            PoolerMode::Direct | PoolerMode::Session => 100,
        }
    }

    /// Pooled connections can be cut by the pooler while idle, so they are
    /// pinged before reuse.
    pub fn test_before_acquire(&self) -> bool {
        self.pooler != PoolerMode::Direct
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    60
}

fn default_max_lifetime() -> u64 {
    1800
}

fn default_application_name() -> String {
    "folio".to_string()
}
