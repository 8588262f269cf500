// feedcycle Infrastructure - SQLite document database client
// Implements: DatabaseConnector, DocumentStore

mod config;
mod connection;
mod connector;
mod document_store;
mod migration;

pub use config::{
    DatabaseConfig, DEFAULT_DB_PATH, DEFAULT_MAX_CONNECTIONS, ENV_DB_MAX_CONNECTIONS, ENV_DB_URL,
};
pub use connection::create_pool;
pub use connector::SqliteConnector;
pub use document_store::SqliteDocumentStore;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
