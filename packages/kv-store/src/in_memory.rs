//! In-memory transactional store.
//!
//! Keys live in a `BTreeMap`, so prefix scans come back in lexicographic
//! key order, the same order a range read on etcd returns.

use std::collections::BTreeMap;
use std::sync::Mutex;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{KeyValue, KvError, Op, OpResponse, Transact};

/// Operation limit applied when no configuration is given.
///
/// Matches etcd's default `--max-txn-ops`.
pub const DEFAULT_MAX_TXN_OPS: usize = 128;

/// Configuration for `InMemoryKvStore`.
///
/// ```rust
/// use pathbind_kv_store::InMemoryConfig;
///
/// let config: InMemoryConfig = serde_json::from_str(r#"{"max_txn_ops": 16}"#).unwrap();
/// assert_eq!(config.max_txn_ops, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryConfig {
    /// Largest batch accepted in one transaction. Zero disables the limit.
    pub max_txn_ops: usize,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            max_txn_ops: DEFAULT_MAX_TXN_OPS,
        }
    }
}

/// A sorted in-process key-value store.
///
/// Each transaction runs under a single lock, so batches are atomic and
/// serialized with respect to each other.
///
/// # Example
///
/// ```rust
/// use pathbind_kv_store::{InMemoryKvStore, Op, OpResponse, Transact};
///
/// let store = InMemoryKvStore::new();
/// let responses = store
///     .transact(&[
///         Op::put("/ids/a", "1"),
///         Op::put("/ids/b", "2"),
///         Op::get_prefix("/ids/"),
///     ])
///     .unwrap();
///
/// assert_eq!(responses[2].kvs().len(), 2);
/// ```
pub struct InMemoryKvStore {
    data: Mutex<BTreeMap<String, Bytes>>,
    config: InMemoryConfig,
}

impl InMemoryKvStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(InMemoryConfig::default())
    }

    /// Create an empty store with the given configuration.
    pub fn with_config(config: InMemoryConfig) -> Self {
        Self {
            data: Mutex::new(BTreeMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &InMemoryConfig {
        &self.config
    }

    /// Read a single key outside of a transaction.
    pub fn get(&self, key: &str) -> Result<Option<Bytes>, KvError> {
        let data = self.data.lock().map_err(|_| KvError::Poisoned)?;
        Ok(data.get(key).cloned())
    }

    /// List the keys under a prefix, in key order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, KvError> {
        let data = self.data.lock().map_err(|_| KvError::Poisoned)?;
        Ok(scan(&data, prefix).map(|(k, _)| k.clone()).collect())
    }

    /// Number of keys stored.
    pub fn len(&self) -> Result<usize, KvError> {
        let data = self.data.lock().map_err(|_| KvError::Poisoned)?;
        Ok(data.len())
    }

    pub fn is_empty(&self) -> Result<bool, KvError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

fn scan<'a>(
    data: &'a BTreeMap<String, Bytes>,
    prefix: &'a str,
) -> impl Iterator<Item = (&'a String, &'a Bytes)> + 'a {
    data.range(prefix.to_string()..)
        .take_while(move |(k, _)| k.starts_with(prefix))
}

impl Transact for InMemoryKvStore {
    fn transact(&self, ops: &[Op]) -> Result<Vec<OpResponse>, KvError> {
        let limit = self.config.max_txn_ops;
        if limit > 0 && ops.len() > limit {
            return Err(KvError::TooManyOperations {
                limit,
                actual: ops.len(),
            });
        }

        let mut data = self.data.lock().map_err(|_| KvError::Poisoned)?;
        tracing::trace!(ops = ops.len(), "applying in-memory transaction");

        // Nothing below can fail, so the batch is all-or-nothing.
        let mut responses = Vec::with_capacity(ops.len());
        for op in ops {
            let response = match op {
                Op::Get(key) => OpResponse::Range {
                    kvs: data
                        .get(key)
                        .map(|v| vec![KeyValue::new(key.clone(), v.clone())])
                        .unwrap_or_default(),
                },
                Op::GetPrefix(prefix) => OpResponse::Range {
                    kvs: scan(&data, prefix)
                        .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
                        .collect(),
                },
                Op::Put { key, value } => {
                    data.insert(key.clone(), Bytes::from(value.clone()));
                    OpResponse::Put
                }
                Op::Delete(key) => OpResponse::Delete {
                    deleted: u64::from(data.remove(key).is_some()),
                },
                Op::DeletePrefix(prefix) => {
                    let doomed: Vec<String> = scan(&data, prefix).map(|(k, _)| k.clone()).collect();
                    for key in &doomed {
                        data.remove(key);
                    }
                    OpResponse::Delete {
                        deleted: doomed.len() as u64,
                    }
                }
            };
            responses.push(response);
        }

        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let store = InMemoryKvStore::new();
        store.transact(&[Op::put("/a/name", "Alice")]).unwrap();

        let responses = store.transact(&[Op::get("/a/name")]).unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].kvs()[0].key, "/a/name");
        assert_eq!(responses[0].kvs()[0].value_str(), Some("Alice"));
    }

    #[test]
    fn get_missing_returns_empty_range() {
        let store = InMemoryKvStore::new();
        let responses = store.transact(&[Op::get("/nope")]).unwrap();
        assert_eq!(responses, vec![OpResponse::Range { kvs: vec![] }]);
    }

    #[test]
    fn responses_follow_op_order() {
        let store = InMemoryKvStore::new();
        let responses = store
            .transact(&[
                Op::put("/k", "v"),
                Op::get("/k"),
                Op::delete("/k"),
                Op::get("/k"),
            ])
            .unwrap();

        assert_eq!(responses[0], OpResponse::Put);
        assert_eq!(responses[1].kvs().len(), 1);
        assert_eq!(responses[2], OpResponse::Delete { deleted: 1 });
        assert!(responses[3].kvs().is_empty());
    }

    #[test]
    fn prefix_scan_is_sorted_and_bounded() {
        let store = InMemoryKvStore::new();
        store
            .transact(&[
                Op::put("/list/b", "2"),
                Op::put("/list/a", "1"),
                Op::put("/listing", "x"),
                Op::put("/other", "y"),
            ])
            .unwrap();

        let responses = store.transact(&[Op::get_prefix("/list/")]).unwrap();
        let keys: Vec<&str> = responses[0].kvs().iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, vec!["/list/a", "/list/b"]);
    }

    #[test]
    fn delete_prefix_removes_only_matching_keys() {
        let store = InMemoryKvStore::new();
        store
            .transact(&[
                Op::put("/list/a", "1"),
                Op::put("/list/b", "2"),
                Op::put("/listing", "x"),
            ])
            .unwrap();

        let responses = store.transact(&[Op::delete_prefix("/list/")]).unwrap();
        assert_eq!(responses[0], OpResponse::Delete { deleted: 2 });
        assert_eq!(store.keys_with_prefix("/").unwrap(), vec!["/listing"]);
    }

    #[test]
    fn oversized_batch_applies_nothing() {
        let store = InMemoryKvStore::with_config(InMemoryConfig { max_txn_ops: 2 });
        let result = store.transact(&[Op::put("/a", "1"), Op::put("/b", "2"), Op::put("/c", "3")]);

        assert!(matches!(
            result,
            Err(KvError::TooManyOperations {
                limit: 2,
                actual: 3
            })
        ));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn zero_limit_disables_check() {
        let store = InMemoryKvStore::with_config(InMemoryConfig { max_txn_ops: 0 });
        let ops: Vec<Op> = (0..300).map(|i| Op::put(format!("/k/{i}"), "v")).collect();
        store.transact(&ops).unwrap();
        assert_eq!(store.len().unwrap(), 300);
    }

    #[test]
    fn empty_batch_is_fine() {
        let store = InMemoryKvStore::new();
        assert!(store.transact(&[]).unwrap().is_empty());
    }

    #[test]
    fn config_defaults_when_missing() {
        let config: InMemoryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, InMemoryConfig::default());
        assert_eq!(config.max_txn_ops, DEFAULT_MAX_TXN_OPS);
    }

    #[test]
    fn direct_get_reads_raw_bytes() {
        let store = InMemoryKvStore::new();
        store.transact(&[Op::put("/raw", "bytes")]).unwrap();
        assert_eq!(store.get("/raw").unwrap(), Some(Bytes::from_static(b"bytes")));
        assert_eq!(store.get("/missing").unwrap(), None);
    }
}
