//! pathbind: a uniform way to keep records in a hierarchical key-value store.
//!
//! Each field of a record is declared once with the key template it lives
//! at. `Mapper::get` then loads every field marked for fetching, and
//! `Mapper::set` writes or deletes every field marked for writing or
//! deletion, each in a single transaction.
//!
//! This crate re-exports the mapping engine (`pathbind-core`) and the store
//! interface it runs on (`pathbind-kv-store`).

pub use pathbind_core::*;

/// The transactional store interface and the in-memory store.
pub mod kv {
    pub use pathbind_kv_store::*;
}

pub use pathbind_kv_store::{InMemoryConfig, InMemoryKvStore, KvError, Op, OpResponse, Transact};

#[cfg(feature = "async")]
pub use pathbind_kv_store::{AsyncTransact, SyncToAsync};
