//! Key-value transaction layer for pathbind.
//!
//! This is the boundary between the mapping engine and whatever store
//! actually holds the data. Everything here is flat: string keys, byte
//! values, and an ordered batch of operations that is applied all at once.
//!
//! - `Op`: a single get/put/delete, optionally over a key prefix
//! - `OpResponse`: the result of one `Op`, in the same position as the `Op`
//! - `Transact`: submit a batch atomically
//! - `InMemoryKvStore`: a sorted in-process store implementing `Transact`
//!
//! # Example
//!
//! ```rust
//! use pathbind_kv_store::{InMemoryKvStore, Op, Transact};
//!
//! let store = InMemoryKvStore::new();
//! store
//!     .transact(&[Op::put("/users/1/name", "Alice")])
//!     .unwrap();
//!
//! let responses = store.transact(&[Op::get("/users/1/name")]).unwrap();
//! assert_eq!(responses[0].kvs()[0].value_str(), Some("Alice"));
//! ```
//!
//! # Async Support
//!
//! Enable the `async` feature for `AsyncTransact` and the `SyncToAsync`
//! adapter.

pub use bytes::Bytes;

mod error;
mod in_memory;
mod op;
mod traits;

pub use error::KvError;
pub use in_memory::{InMemoryConfig, InMemoryKvStore, DEFAULT_MAX_TXN_OPS};
pub use op::{KeyValue, Op, OpResponse};
pub use traits::Transact;

#[cfg(feature = "async")]
mod async_traits;

#[cfg(feature = "async")]
pub use async_traits::{AsyncTransact, SyncToAsync};
