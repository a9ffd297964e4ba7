//! Async mapper over an `AsyncTransact` store.
//!
//! The walk and the response pass are synchronous; only the transaction
//! is awaited.

use pathbind_kv_store::{AsyncTransact, Op, OpResponse};

use crate::mapper::apply_responses;
use crate::record::Record;
use crate::template::PathVars;
use crate::walker::{build_fetch, build_write};
use crate::{Error, Result};

/// Async counterpart of `Mapper`.
///
/// # Example
///
/// ```rust,ignore
/// use pathbind_core::AsyncMapper;
/// use pathbind_kv_store::{InMemoryKvStore, SyncToAsync};
///
/// let mapper = AsyncMapper::new(SyncToAsync::new(InMemoryKvStore::new()));
/// mapper.set(&mut record, &vars).await?;
/// ```
pub struct AsyncMapper<S> {
    store: S,
}

impl<S: AsyncTransact> AsyncMapper<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// See `Mapper::get`.
    pub async fn get(&self, record: &mut dyn Record, vars: &PathVars) -> Result<()> {
        self.try_get(record, vars).await.inspect_err(|e| {
            tracing::error!(error = %e, "error getting record");
        })
    }

    /// See `Mapper::set`.
    pub async fn set(&self, record: &mut dyn Record, vars: &PathVars) -> Result<()> {
        self.try_set(record, vars).await.inspect_err(|e| {
            tracing::error!(error = %e, "error setting record");
        })
    }

    /// Submit `ops` as one transaction and check the response count.
    pub async fn execute(&self, ops: &[Op]) -> Result<Vec<OpResponse>> {
        tracing::debug!(ops = ops.len(), "submitting transaction");
        let responses = self.store.transact_async(ops).await?;

        if responses.len() != ops.len() {
            return Err(Error::ResponseCountMismatch {
                expected: ops.len(),
                actual: responses.len(),
            });
        }
        Ok(responses)
    }

    async fn try_get(&self, record: &mut dyn Record, vars: &PathVars) -> Result<()> {
        let plan = build_fetch(record, vars)?;
        let responses = self.execute(&plan.ops).await?;
        apply_responses(plan.callbacks, &responses)
    }

    async fn try_set(&self, record: &mut dyn Record, vars: &PathVars) -> Result<()> {
        let ops = build_write(record, vars)?;
        self.execute(&ops).await?;
        Ok(())
    }
}
