// Database Connector Port

use async_trait::async_trait;
use thiserror::Error;

/// Failure to construct a database client
///
/// Raised only while building the handle; once a handle exists it is never
/// produced again for that provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitializationError {
    /// Credentials or configuration could not be resolved
    #[error("database configuration invalid: {0}")]
    Config(String),

    /// Configuration resolved but the client could not be built
    #[error("database connection failed: {0}")]
    Connection(String),
}

/// Builds a database client from ambient/default configuration
///
/// The handle provider consumes nothing but this: "construct a client
/// instance, or fail".
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Opaque client handle handed out to the rest of the application
    type Handle: Send + Sync;

    /// Construct a new client
    async fn connect(&self) -> Result<Self::Handle, InitializationError>;
}
