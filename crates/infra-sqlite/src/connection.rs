// SQLite Connection Pool Setup

use crate::config::DatabaseConfig;
use feedcycle_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::debug;

/// Create SQLite connection pool with WAL mode
///
/// The parent directory of a file database is created when missing.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::Config(format!("invalid database url {:?}: {}", config.url, e)))?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.busy_timeout)
        .foreign_keys(true)
        .create_if_missing(true);

    let mut pool_options =
        SqlitePoolOptions::new().max_connections(config.effective_max_connections());

    if config.is_in_memory() {
        // Dropping the last connection drops the database
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else if let Some(dir) = options.get_filename().parent() {
        if !dir.as_os_str().is_empty() {
            debug!(dir = %dir.display(), "Ensuring database directory exists");
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                AppError::Database(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }
    }

    pool_options
        .connect_with(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
