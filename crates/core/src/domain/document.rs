// Document Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Document ID (non-empty, caller supplied or UUID v4)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(DomainError::InvalidDocumentId(s));
        }
        Ok(Self(s))
    }

    /// Ids minted by an `IdProvider` are non-empty by construction
    pub(crate) fn generated(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collection name: ASCII alphanumerics, `_` and `-`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Collection(String);

impl Collection {
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        let valid = !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DomainError::InvalidCollection(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Collection {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<Collection> for String {
    fn from(c: Collection) -> Self {
        c.0
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A JSON document stored through the database handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub collection: Collection,
    pub data: serde_json::Value,

    /// Last write time (epoch ms), stamped by the store
    pub updated_at: i64,
}

impl Document {
    /// Create a document that has not been written yet (`updated_at` = 0)
    pub fn new(collection: Collection, id: DocumentId, data: serde_json::Value) -> Self {
        Self {
            id,
            collection,
            data,
            updated_at: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_rejects_blank() {
        assert!(DocumentId::new("").is_err());
        assert!(DocumentId::new("   ").is_err());
        assert_eq!(DocumentId::new("story-1").unwrap().as_str(), "story-1");
    }

    #[test]
    fn test_collection_charset() {
        assert!(Collection::new("feed_items").is_ok());
        assert!(Collection::new("cycle-2024").is_ok());
        assert!(Collection::new("").is_err());
        assert!(Collection::new("feed items").is_err());
        assert!(Collection::new("feed/items").is_err());
    }

    #[test]
    fn test_document_serde_validates_fields() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "collection": "stories",
            "data": {"title": "hello"},
            "updated_at": 42
        }))
        .unwrap();
        assert_eq!(doc.id.as_str(), "a1");
        assert_eq!(doc.updated_at, 42);

        let bad = serde_json::from_value::<Document>(serde_json::json!({
            "id": "a1",
            "collection": "bad name",
            "data": null,
            "updated_at": 0
        }));
        assert!(bad.is_err());
    }
}
