// Document Store Port (Interface)

use crate::domain::{Collection, Document, DocumentId};
use crate::error::Result;
use async_trait::async_trait;

/// Document persistence operations exposed by a database handle
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find a document by collection and id
    async fn get(&self, collection: &Collection, id: &DocumentId) -> Result<Option<Document>>;

    /// Insert or replace a document; returns it with `updated_at` stamped
    async fn set(&self, document: Document) -> Result<Document>;

    /// Delete a document, returns whether it existed
    async fn delete(&self, collection: &Collection, id: &DocumentId) -> Result<bool>;

    /// Most recently updated first (ties broken by id)
    async fn list(&self, collection: &Collection, limit: u32) -> Result<Vec<Document>>;

    /// Count documents in a collection
    async fn count(&self, collection: &Collection) -> Result<u64>;
}
