//! Turning records into operation batches.
//!
//! Both directions walk the record's field table depth-first, in
//! declaration order. The read direction also produces one callback per
//! operation; callback `i` knows how to apply response `i` to the field that
//! produced operation `i`, and to nothing else.

use pathbind_kv_store::{KeyValue, Op, OpResponse};

use crate::field::Intent;
use crate::record::{CollectionSlot, Record, Slot, ValueSlot};
use crate::template::{resolve, PathVars, ACCUMULATOR};
use crate::value::generate_unique_id;
use crate::{Error, Result};

/// Applies one response to the field it was built for.
pub type ResponseCallback<'a> = Box<dyn FnOnce(&OpResponse) -> Result<()> + Send + 'a>;

/// Operations for a read, with one callback per operation.
pub struct FetchPlan<'a> {
    pub ops: Vec<Op>,
    pub callbacks: Vec<ResponseCallback<'a>>,
}

impl<'a> FetchPlan<'a> {
    fn new() -> Self {
        Self {
            ops: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    fn push(&mut self, op: Op, callback: ResponseCallback<'a>) {
        self.ops.push(op);
        self.callbacks.push(callback);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Build the read batch for `record`.
///
/// Only fields with `Fetch` intent produce operations. A collection is
/// fetched when its first element has `Fetch` intent; the rest of its
/// elements are not looked at.
///
/// The returned callbacks borrow the record's fields until they are run or
/// dropped.
pub fn build_fetch<'a>(record: &'a mut dyn Record, vars: &PathVars) -> Result<FetchPlan<'a>> {
    let mut plan = FetchPlan::new();
    Walker::new(vars).fetch_record(record, &mut plan)?;
    Ok(plan)
}

/// Build the write batch for `record`.
///
/// `Write` fields become puts and `Delete` fields become deletes; `Fetch`
/// and `Absent` fields are skipped. A collection holding exactly one
/// `Delete` element is cleared; otherwise each `Write` element is put under
/// a fresh unique sub-key.
pub fn build_write(record: &mut dyn Record, vars: &PathVars) -> Result<Vec<Op>> {
    let mut ops = Vec::new();
    Walker::new(vars).write_record(record, &mut ops)?;
    Ok(ops)
}

struct Walker {
    vars: PathVars,
}

impl Walker {
    fn new(vars: &PathVars) -> Self {
        let mut vars = vars.clone();
        vars.insert(ACCUMULATOR, "");
        Self { vars }
    }

    /// Resolve a record field's key.
    ///
    /// Record fields are never resolved inside a collection, since
    /// collections of records are rejected before anything beneath them is
    /// walked.
    fn key_for(&self, template: &str) -> Result<String> {
        resolve(template, &self.vars, false)
    }

    /// Bind `:@` to `key` for the fields of a nested record, returning the
    /// binding to restore with `leave` once that record is walked.
    fn enter(&mut self, key: &str) -> Option<String> {
        self.vars.insert(ACCUMULATOR, key)
    }

    /// Restore the binding saved by `enter`, so later siblings resolve
    /// against their own parent's key.
    fn leave(&mut self, previous: Option<String>) {
        match previous {
            Some(previous) => self.vars.insert(ACCUMULATOR, previous),
            None => self.vars.remove(ACCUMULATOR),
        };
    }

    fn fetch_record<'a>(
        &mut self,
        record: &'a mut dyn Record,
        plan: &mut FetchPlan<'a>,
    ) -> Result<()> {
        for entry in record.fields() {
            let key = self.key_for(entry.template)?;
            match entry.slot {
                Slot::Leaf(slot) => {
                    if slot.intent() == Some(Intent::Fetch) {
                        tracing::trace!(%key, "fetch field");
                        plan.push(Op::get(key.clone()), fetch_leaf(key, slot));
                    }
                }
                Slot::Nested(child) => {
                    let previous = self.enter(&key);
                    let result = self.fetch_record(child, plan);
                    self.leave(previous);
                    result?;
                }
                Slot::Collection(items) => fetch_collection(&key, items, plan),
                Slot::Records(items) => {
                    if !items.is_empty() {
                        return Err(Error::InvalidCollectionElement { key });
                    }
                }
            }
        }
        Ok(())
    }

    fn write_record(&mut self, record: &mut dyn Record, ops: &mut Vec<Op>) -> Result<()> {
        for entry in record.fields() {
            let key = self.key_for(entry.template)?;
            match entry.slot {
                Slot::Leaf(slot) => {
                    if slot.intent() == Some(Intent::Delete) {
                        tracing::trace!(%key, "delete field");
                        ops.push(Op::delete(key));
                    } else if let Some(value) = slot.encode() {
                        tracing::trace!(%key, "put field");
                        ops.push(Op::put(key, value));
                    }
                }
                Slot::Nested(child) => {
                    let previous = self.enter(&key);
                    let result = self.write_record(child, ops);
                    self.leave(previous);
                    result?;
                }
                Slot::Collection(items) => write_collection(&key, items, ops),
                Slot::Records(items) => {
                    if !items.is_empty() {
                        return Err(Error::UnsupportedElementKind { key });
                    }
                }
            }
        }
        Ok(())
    }
}

fn range_entries<'r>(key: &str, response: &'r OpResponse) -> Result<&'r [KeyValue]> {
    match response {
        OpResponse::Range { kvs } => Ok(kvs),
        other => Err(Error::field_decode(
            key,
            format!("expected a range response, got {:?}", other),
        )),
    }
}

fn utf8_value<'r>(kv: &'r KeyValue) -> Result<&'r str> {
    kv.value_str()
        .ok_or_else(|| Error::field_decode(&kv.key, "stored value is not valid UTF-8"))
}

fn fetch_leaf<'a>(key: String, slot: &'a mut dyn ValueSlot) -> ResponseCallback<'a> {
    Box::new(move |response: &OpResponse| {
        let Some(kv) = range_entries(&key, response)?.first() else {
            slot.reset();
            return Ok(());
        };
        slot.decode(utf8_value(kv)?)
            .map_err(|e| Error::field_decode(&key, e))
    })
}

fn fetch_collection<'a>(key: &str, items: &'a mut dyn CollectionSlot, plan: &mut FetchPlan<'a>) {
    // The first element only tells us whether to fetch at all.
    if items.intent_at(0) != Some(Intent::Fetch) {
        return;
    }

    let prefix = prefix_of(key);
    tracing::trace!(%prefix, "fetch collection");
    let op = Op::get_prefix(prefix.clone());
    let callback: ResponseCallback<'a> = Box::new(move |response: &OpResponse| {
        let kvs = range_entries(&prefix, response)?;
        items.clear();
        for kv in kvs {
            items
                .push_decoded(utf8_value(kv)?)
                .map_err(|e| Error::field_decode(&kv.key, e))?;
        }
        Ok(())
    });
    plan.push(op, callback);
}

fn prefix_of(key: &str) -> String {
    format!("{}/", key)
}

fn write_collection(key: &str, items: &dyn CollectionSlot, ops: &mut Vec<Op>) {
    if items.len() == 1 && items.intent_at(0) == Some(Intent::Delete) {
        tracing::trace!(%key, "clear collection");
        ops.push(Op::delete_prefix(prefix_of(key)));
        return;
    }

    for index in 0..items.len() {
        if let Some(value) = items.encode_at(index) {
            ops.push(Op::put(format!("{}/{}", key, generate_unique_id()), value));
        }
    }
}
