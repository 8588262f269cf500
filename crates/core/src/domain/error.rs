// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid document id: {0:?}")]
    InvalidDocumentId(String),

    #[error("Invalid collection name: {0:?}")]
    InvalidCollection(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
