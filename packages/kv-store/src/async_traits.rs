//! Async variant of `Transact`.
//!
//! Enable the `async` feature to use these types:
//!
//! ```toml
//! [dependencies]
//! pathbind-kv-store = { version = "0.1", features = ["async"] }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::{KvError, Op, OpResponse, Transact};

/// Async version of `Transact`.
///
/// Same contract: atomic, one response per op, submission order.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn AsyncTransact>`.
#[async_trait]
pub trait AsyncTransact: Send + Sync {
    async fn transact_async(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError>;
}

#[async_trait]
impl<T: AsyncTransact + ?Sized> AsyncTransact for &T {
    async fn transact_async(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError> {
        (**self).transact_async(ops).await
    }
}

#[async_trait]
impl<T: AsyncTransact + ?Sized> AsyncTransact for Box<T> {
    async fn transact_async(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError> {
        self.as_ref().transact_async(ops).await
    }
}

/// Adapter to use a sync store where an `AsyncTransact` is expected.
///
/// The wrapped store runs inline on the calling task. For stores that block
/// on I/O, implement `AsyncTransact` directly instead.
///
/// # Example
///
/// ```rust,ignore
/// use pathbind_kv_store::{InMemoryKvStore, SyncToAsync};
///
/// let store = SyncToAsync::new(InMemoryKvStore::new());
/// ```
pub struct SyncToAsync<T> {
    inner: Arc<T>,
}

impl<T> SyncToAsync<T> {
    /// Create a new adapter wrapping a sync store.
    pub fn new(inner: T) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Get a reference to the wrapped store.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T> Clone for SyncToAsync<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[async_trait]
impl<T: Transact + 'static> AsyncTransact for SyncToAsync<T> {
    async fn transact_async(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError> {
        self.inner.transact(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryKvStore;

    #[tokio::test]
    async fn sync_to_async_works() {
        let store = SyncToAsync::new(InMemoryKvStore::new());

        store
            .transact_async(&[Op::put("/a", "hello")])
            .await
            .unwrap();

        let responses = store.transact_async(&[Op::get("/a")]).await.unwrap();
        assert_eq!(responses[0].kvs()[0].value_str(), Some("hello"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = SyncToAsync::new(InMemoryKvStore::new());
        let other = store.clone();

        store.transact_async(&[Op::put("/a", "1")]).await.unwrap();
        assert_eq!(other.inner().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn boxed_async_store_works() {
        let store: Box<dyn AsyncTransact> = Box::new(SyncToAsync::new(InMemoryKvStore::new()));
        let responses = store.transact_async(&[Op::get("/none")]).await.unwrap();
        assert!(responses[0].kvs().is_empty());
    }
}
