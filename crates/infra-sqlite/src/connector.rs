// SQLite DatabaseConnector: resolves config, opens the pool, migrates

use crate::config::DatabaseConfig;
use crate::connection::create_pool;
use crate::document_store::SqliteDocumentStore;
use crate::migration::run_migrations;
use async_trait::async_trait;
use feedcycle_core::error::AppError;
use feedcycle_core::port::{DatabaseConnector, InitializationError, TimeProvider};
use std::sync::Arc;
use tracing::info;

/// Where the connector gets its settings from
enum ConfigSource {
    /// Environment, optionally with the URL supplied by the caller
    Env { url: Option<String> },
    Explicit(DatabaseConfig),
}

pub struct SqliteConnector {
    source: ConfigSource,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteConnector {
    /// Resolve settings from the environment at connect time
    pub fn from_env(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            source: ConfigSource::Env { url: None },
            time_provider,
        }
    }

    /// Environment settings with `url` replacing `FEEDCYCLE_DB_URL`
    pub fn from_env_with_url(url: impl Into<String>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            source: ConfigSource::Env {
                url: Some(url.into()),
            },
            time_provider,
        }
    }

    pub fn with_config(config: DatabaseConfig, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            source: ConfigSource::Explicit(config),
            time_provider,
        }
    }
}

fn to_init_error(err: AppError) -> InitializationError {
    match err {
        AppError::Config(msg) => InitializationError::Config(msg),
        AppError::Initialization(e) => e,
        other => InitializationError::Connection(other.to_string()),
    }
}

#[async_trait]
impl DatabaseConnector for SqliteConnector {
    type Handle = SqliteDocumentStore;

    async fn connect(&self) -> Result<SqliteDocumentStore, InitializationError> {
        let config = match &self.source {
            ConfigSource::Env { url } => DatabaseConfig::from_env_with_url(url.as_deref())?,
            ConfigSource::Explicit(config) => config.clone(),
        };

        info!(
            url = %config.url,
            max_connections = config.effective_max_connections(),
            "Connecting to document database"
        );

        let pool = create_pool(&config).await.map_err(to_init_error)?;
        let version = run_migrations(&pool).await.map_err(to_init_error)?;
        info!(schema_version = version, "Document database ready");

        Ok(SqliteDocumentStore::new(pool, self.time_provider.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedcycle_core::port::time_provider::SystemTimeProvider;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_connect_in_memory() {
        let connector =
            SqliteConnector::with_config(DatabaseConfig::in_memory(), Arc::new(SystemTimeProvider));
        let store = connector.connect().await.unwrap();
        assert!(store.collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_failure_is_connection_error() {
        let blocker = NamedTempFile::new().unwrap();

        let config =
            DatabaseConfig::with_url(blocker.path().join("db.sqlite").display().to_string());
        let connector = SqliteConnector::with_config(config, Arc::new(SystemTimeProvider));

        let err = match connector.connect().await {
            Err(e) => e,
            Ok(_) => panic!("connect should fail"),
        };
        assert!(matches!(err, InitializationError::Connection(_)));
    }
}
