//! Postgres pool for the hosted project database.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use folio_core::config::DatabaseConfig;
use folio_core::error::{AppError, ErrorKind};

/// Shared connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connect with the pool and statement-cache settings the configured
    /// pooler mode allows.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options = connect_options(config)?;
        info!(
            host = options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or("postgres"),
            user = options.get_username(),
            pooler = ?config.pooler,
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = pool_options(config)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Parse the URL and apply per-connection settings. The password never
/// leaves the options struct, so nothing here needs masking.
fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, AppError> {
    let options = PgConnectOptions::from_str(&config.url).map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, "Invalid database URL", e)
    })?;

    Ok(options
        .application_name(&config.application_name)
        .statement_cache_capacity(config.statement_cache_capacity()))
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
        .test_before_acquire(config.test_before_acquire())
}
