// Domain Layer - Pure entities

pub mod document;
pub mod error;

// Re-exports
pub use document::{Collection, Document, DocumentId};
pub use error::DomainError;
