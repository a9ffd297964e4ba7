//! The transaction trait.

use std::sync::Arc;

use crate::{KvError, Op, OpResponse};

/// Submit a batch of operations as one atomic transaction.
///
/// Implementations must apply either every operation or none of them, and
/// must return exactly one `OpResponse` per `Op`, in submission order. The
/// batch is unconditional: there is no compare guard.
///
/// Takes `&self` so one handle can serve concurrent callers; whatever
/// synchronization that needs is the implementation's business.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Transact>`.
pub trait Transact: Send + Sync {
    /// Apply `ops` atomically.
    ///
    /// # Returns
    ///
    /// * `Ok(responses)` - One response per op, same order.
    /// * `Err(KvError)` - Nothing was applied.
    fn transact(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError>;
}

// Blanket implementations for references and smart pointers

impl<T: Transact + ?Sized> Transact for &T {
    fn transact(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError> {
        (**self).transact(ops)
    }
}

impl<T: Transact + ?Sized> Transact for Box<T> {
    fn transact(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError> {
        self.as_ref().transact(ops)
    }
}

impl<T: Transact + ?Sized> Transact for Arc<T> {
    fn transact(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError> {
        self.as_ref().transact(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every batch it sees and answers puts only.
    struct RecordingStore {
        batches: Mutex<Vec<Vec<Op>>>,
    }

    impl Transact for RecordingStore {
        fn transact(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError> {
            self.batches.lock().unwrap().push(ops.to_vec());
            Ok(ops.iter().map(|_| OpResponse::Put).collect())
        }
    }

    #[test]
    fn object_safety_works() {
        let store = RecordingStore {
            batches: Mutex::new(Vec::new()),
        };
        let boxed: Box<dyn Transact> = Box::new(store);

        let responses = boxed.transact(&[Op::put("/a", "1")]).unwrap();
        assert_eq!(responses, vec![OpResponse::Put]);
    }

    #[test]
    fn shared_handle_works() {
        let store = Arc::new(RecordingStore {
            batches: Mutex::new(Vec::new()),
        });
        let by_ref = &store;

        by_ref.transact(&[Op::put("/a", "1")]).unwrap();
        store.transact(&[Op::put("/b", "2"), Op::put("/c", "3")]).unwrap();

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].len(), 2);
    }
}
