//! The mapper: walk, submit, correlate.

use pathbind_kv_store::{Op, OpResponse, Transact};

use crate::record::Record;
use crate::template::PathVars;
use crate::walker::{build_fetch, build_write, ResponseCallback};
use crate::{Error, Result};

/// Reads and writes records against a transactional store.
///
/// Each `get` or `set` is one walk of the record, one transaction and, for
/// reads, one pass applying the responses. There is no caching and no retry.
///
/// # Example
///
/// ```rust
/// use pathbind_core::{record, Field, Mapper, PathVars, TextField, UintField};
/// use pathbind_kv_store::InMemoryKvStore;
///
/// #[derive(Default)]
/// struct User {
///     name: TextField,
///     visits: UintField,
/// }
///
/// record!(User {
///     name: leaf => "/users/:id/name",
///     visits: leaf => "/users/:id/visits",
/// });
///
/// let mapper = Mapper::new(InMemoryKvStore::new());
/// let vars = PathVars::new().with("id", "7");
///
/// let mut user = User {
///     name: Field::write("Alice"),
///     visits: Field::write(3u64),
/// };
/// mapper.set(&mut user, &vars).unwrap();
///
/// let mut loaded = User {
///     name: Field::fetch(),
///     visits: Field::fetch(),
/// };
/// mapper.get(&mut loaded, &vars).unwrap();
/// assert_eq!(loaded.visits.value(), Some(&3));
/// ```
pub struct Mapper<S> {
    store: S,
}

impl<S: Transact> Mapper<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Load every `Fetch` field of `record` from the store.
    ///
    /// Fields whose key does not exist become `Absent`; loaded fields
    /// become `Write(value)`. Fields with any other intent are untouched.
    ///
    /// If a response fails to decode, the call fails, but fields filled by
    /// earlier responses keep their new values.
    pub fn get(&self, record: &mut dyn Record, vars: &PathVars) -> Result<()> {
        self.try_get(record, vars).inspect_err(|e| {
            tracing::error!(error = %e, "error getting record");
        })
    }

    /// Store every `Write` field and remove every `Delete` field of
    /// `record`, in one transaction.
    pub fn set(&self, record: &mut dyn Record, vars: &PathVars) -> Result<()> {
        self.try_set(record, vars).inspect_err(|e| {
            tracing::error!(error = %e, "error setting record");
        })
    }

    /// Submit `ops` as one transaction and check the response count.
    pub fn execute(&self, ops: &[Op]) -> Result<Vec<OpResponse>> {
        tracing::debug!(ops = ops.len(), "submitting transaction");
        let responses = self.store.transact(ops)?;

        if responses.len() != ops.len() {
            return Err(Error::ResponseCountMismatch {
                expected: ops.len(),
                actual: responses.len(),
            });
        }
        Ok(responses)
    }

    fn try_get(&self, record: &mut dyn Record, vars: &PathVars) -> Result<()> {
        let plan = build_fetch(record, vars)?;
        let responses = self.execute(&plan.ops)?;
        apply_responses(plan.callbacks, &responses)
    }

    fn try_set(&self, record: &mut dyn Record, vars: &PathVars) -> Result<()> {
        let ops = build_write(record, vars)?;
        self.execute(&ops)?;
        Ok(())
    }
}

/// Apply `responses[i]` with `callbacks[i]`, in order.
///
/// Stops at the first failing callback. Callbacks that already ran are not
/// undone.
pub fn apply_responses(callbacks: Vec<ResponseCallback<'_>>, responses: &[OpResponse]) -> Result<()> {
    if callbacks.len() != responses.len() {
        return Err(Error::ResponseCountMismatch {
            expected: callbacks.len(),
            actual: responses.len(),
        });
    }

    for (callback, response) in callbacks.into_iter().zip(responses) {
        callback(response)?;
    }
    Ok(())
}
