// ID Provider Port (for deterministic testing)

use crate::domain::DocumentId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generates ids for documents stored without one
pub trait IdProvider: Send + Sync {
    fn generate_id(&self) -> DocumentId;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> DocumentId {
        DocumentId::generated(uuid::Uuid::new_v4().to_string())
    }
}

/// `{prefix}-1`, `{prefix}-2`, ...
pub struct SequentialIdProvider {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self) -> DocumentId {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        DocumentId::generated(format!("{}-{}", self.prefix, n))
    }
}
