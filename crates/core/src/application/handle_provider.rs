// Database Handle Provider
use crate::port::{DatabaseConnector, InitializationError};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Lazily built, shared database handle
///
/// Owned by the composition root and injected wherever a handle is needed.
/// The first `get()` asks the connector for a client; every later call
/// returns the same `Arc`. Concurrent first callers wait on a single
/// in-flight construction.
///
/// A failed construction is returned to the caller as-is and leaves the
/// provider empty, so the next `get()` asks the connector again.
pub struct DatabaseHandleProvider<C: DatabaseConnector> {
    connector: C,
    handle: OnceCell<Arc<C::Handle>>,
}

impl<C: DatabaseConnector> DatabaseHandleProvider<C> {
    /// Create a provider; nothing is connected until the first `get()`
    ///
    /// # Example
    /// ```text
    /// let provider = DatabaseHandleProvider::new(SqliteConnector::from_env(clock));
    /// let store = provider.get().await?;
    /// ```
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            handle: OnceCell::new(),
        }
    }

    /// Return the handle, constructing it on first use
    pub async fn get(&self) -> Result<Arc<C::Handle>, InitializationError> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                match self.connector.connect().await {
                    Ok(handle) => {
                        info!("Database handle initialized");
                        Ok(Arc::new(handle))
                    }
                    Err(e) => {
                        error!(error = %e, "Database handle initialization failed");
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(Arc::clone(handle))
    }

    /// Whether a handle has been built (never triggers construction)
    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeHandle {
        serial: usize,
    }

    /// Counts constructions; fails the first `failures` attempts
    #[derive(Default)]
    struct CountingConnector {
        attempts: AtomicUsize,
        failures: usize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl DatabaseConnector for CountingConnector {
        type Handle = FakeHandle;

        async fn connect(&self) -> Result<FakeHandle, InitializationError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if attempt <= self.failures {
                return Err(InitializationError::Config("no credentials".to_string()));
            }
            Ok(FakeHandle { serial: attempt })
        }
    }

    #[tokio::test]
    async fn test_lazy_until_first_get() {
        let provider = DatabaseHandleProvider::new(CountingConnector::default());
        assert!(!provider.is_initialized());
        assert_eq!(provider.connector.attempts.load(Ordering::SeqCst), 0);

        provider.get().await.unwrap();
        assert!(provider.is_initialized());
    }

    #[tokio::test]
    async fn test_repeated_get_returns_same_instance() {
        let provider = DatabaseHandleProvider::new(CountingConnector::default());

        let first = provider.get().await.unwrap();
        let second = provider.get().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.serial, 1);
        assert_eq!(provider.connector.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_builds_once() {
        let provider = Arc::new(DatabaseHandleProvider::new(CountingConnector {
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        }));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let provider = Arc::clone(&provider);
                tokio::spawn(async move { provider.get().await })
            })
            .collect();

        let handles: Vec<_> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        assert_eq!(provider.connector.attempts.load(Ordering::SeqCst), 1);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[tokio::test]
    async fn test_failure_propagates_and_is_not_cached() {
        let provider = DatabaseHandleProvider::new(CountingConnector {
            failures: 1,
            ..Default::default()
        });

        let err = match provider.get().await {
            Err(e) => e,
            Ok(_) => panic!("first attempt should fail"),
        };
        assert_eq!(err, InitializationError::Config("no credentials".to_string()));
        assert!(!provider.is_initialized());

        // Provider does not retry on its own; the next call is a fresh attempt
        let handle = provider.get().await.unwrap();
        assert_eq!(handle.serial, 2);
        assert_eq!(provider.connector.attempts.load(Ordering::SeqCst), 2);
    }
}
