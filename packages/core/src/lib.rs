//! pathbind core: records mapped onto a key-value namespace.
//!
//! A record declares, once, which key each of its fields lives at. From
//! that declaration this crate builds the batched operations that read or
//! write the record, and applies the responses back onto its fields:
//!
//! - `TypedValue`: the string encoding of each scalar type
//! - `Field`: a scalar tagged with what to do with it (fetch, write, delete)
//! - `resolve` / `PathVars`: key templates and their variables
//! - `Record` / `record!`: the per-type field table
//! - `build_fetch` / `build_write`: record → operations (+ callbacks)
//! - `Mapper`: one transaction per call against a `Transact` store
//!
//! # Example
//!
//! ```rust
//! use pathbind_core::{record, Field, IdField, Mapper, PathVars, TextField};
//! use pathbind_kv_store::InMemoryKvStore;
//!
//! #[derive(Default)]
//! struct Team {
//!     name: TextField,
//!     members: Vec<IdField>,
//! }
//!
//! record!(Team {
//!     name: leaf => "/teams/:team/name",
//!     members: collection => "/teams/:team/members",
//! });
//!
//! let mapper = Mapper::new(InMemoryKvStore::new());
//! let vars = PathVars::new().with("team", "core");
//!
//! let mut team = Team {
//!     name: Field::write("Core"),
//!     members: vec![Field::write("u1"), Field::write("u2")],
//! };
//! mapper.set(&mut team, &vars).unwrap();
//!
//! let mut loaded = Team {
//!     name: Field::fetch(),
//!     members: vec![Field::fetch()],
//! };
//! mapper.get(&mut loaded, &vars).unwrap();
//! assert_eq!(loaded.members.len(), 2);
//! ```
//!
//! # Async Support
//!
//! Enable the `async` feature for `AsyncMapper`, which drives an
//! `AsyncTransact` store.

mod error;
mod field;
mod mapper;
mod record;
mod template;
mod value;
mod walker;

pub use error::{Error, ParseError, Result};
pub use field::{
    BoolField, BytesField, Field, IdField, Intent, IntField, TextField, TimeField, UintField,
};
pub use mapper::{apply_responses, Mapper};
pub use record::{CollectionSlot, FieldEntry, Record, RecordSeq, Slot, ValueSlot};
pub use template::{resolve, PathVars, ACCUMULATOR, SEPARATOR, VARIABLE_MARKER};
pub use value::{generate_unique_id, Blob, Identifier, TypedValue};
pub use walker::{build_fetch, build_write, FetchPlan, ResponseCallback};

#[cfg(feature = "async")]
mod async_mapper;

#[cfg(feature = "async")]
pub use async_mapper::AsyncMapper;
