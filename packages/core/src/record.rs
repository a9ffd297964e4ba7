//! Record schemas.
//!
//! A record describes its own layout: for each mapped field, the path
//! template and a mutable handle to the field. The walker never inspects
//! types at runtime; it only sees the table `Record::fields` returns.
//!
//! Most records declare the table with `record!`:
//!
//! ```rust
//! use pathbind_core::{record, BoolField, IntField, TextField};
//!
//! #[derive(Default)]
//! struct Child {
//!     flag: BoolField,
//!     count: IntField,
//! }
//!
//! #[derive(Default)]
//! struct Parent {
//!     name: TextField,
//!     child: Child,
//!     cache: Option<String>, // not mapped
//! }
//!
//! record!(Child {
//!     flag: leaf => ":@/flag",
//!     count: leaf => ":@/count",
//! });
//!
//! record!(Parent {
//!     name: leaf => "/users/:id/name",
//!     child: nested => "/users/:id/child",
//! });
//! ```

use crate::field::{Field, Intent};
use crate::value::TypedValue;
use crate::ParseError;

/// A composite whose fields map to store keys.
pub trait Record: Send {
    /// The mapped fields, in declaration order.
    ///
    /// Fields that are not listed are ignored by `get` and `set`.
    fn fields(&mut self) -> Vec<FieldEntry<'_>>;
}

/// One mapped field: where it lives and a handle to it.
pub struct FieldEntry<'a> {
    pub template: &'static str,
    pub slot: Slot<'a>,
}

impl<'a> FieldEntry<'a> {
    /// A scalar field.
    pub fn leaf<T: TypedValue>(template: &'static str, field: &'a mut Field<T>) -> Self {
        Self {
            template,
            slot: Slot::Leaf(field),
        }
    }

    /// A nested record; its templates may use `:@` for this field's key.
    pub fn nested<R: Record>(template: &'static str, record: &'a mut R) -> Self {
        Self {
            template,
            slot: Slot::Nested(record),
        }
    }

    /// A sequence of scalars stored under this field's key.
    pub fn collection<T: TypedValue>(template: &'static str, items: &'a mut Vec<Field<T>>) -> Self {
        Self {
            template,
            slot: Slot::Collection(items),
        }
    }

    /// A sequence of records. Declared so it can be rejected: such fields
    /// fail `get` and `set` whenever they are non-empty.
    pub fn records<R: Record>(template: &'static str, items: &'a mut Vec<R>) -> Self {
        Self {
            template,
            slot: Slot::Records(items),
        }
    }
}

/// Handle to a mapped field, by kind.
pub enum Slot<'a> {
    Leaf(&'a mut dyn ValueSlot),
    Nested(&'a mut dyn Record),
    Collection(&'a mut dyn CollectionSlot),
    Records(&'a mut dyn RecordSeq),
}

/// Type-erased access to a `Field<T>`.
pub trait ValueSlot: Send {
    fn intent(&self) -> Option<Intent>;

    /// The store encoding of the held value, if the field is `Write`.
    fn encode(&self) -> Option<String>;

    /// Make the field `Absent`.
    fn reset(&mut self);

    /// Parse `raw` and hold the result as `Write(value)`.
    ///
    /// On failure the field is left unchanged.
    fn decode(&mut self, raw: &str) -> Result<(), ParseError>;
}

impl<T: TypedValue> ValueSlot for Field<T> {
    fn intent(&self) -> Option<Intent> {
        Field::intent(self)
    }

    fn encode(&self) -> Option<String> {
        self.value().map(TypedValue::to_store_string)
    }

    fn reset(&mut self) {
        *self = Field::Absent;
    }

    fn decode(&mut self, raw: &str) -> Result<(), ParseError> {
        *self = Field::Write(T::from_store_string(raw)?);
        Ok(())
    }
}

/// Type-erased access to a `Vec<Field<T>>`.
pub trait CollectionSlot: Send {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Intent of the element at `index`; `None` if absent or out of range.
    fn intent_at(&self, index: usize) -> Option<Intent>;

    /// Store encoding of the element at `index`, if it is `Write`.
    fn encode_at(&self, index: usize) -> Option<String>;

    fn clear(&mut self);

    /// Parse `raw` and append it as a `Write` element.
    fn push_decoded(&mut self, raw: &str) -> Result<(), ParseError>;
}

impl<T: TypedValue> CollectionSlot for Vec<Field<T>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn intent_at(&self, index: usize) -> Option<Intent> {
        self.get(index).and_then(Field::intent)
    }

    fn encode_at(&self, index: usize) -> Option<String> {
        self.get(index)
            .and_then(Field::value)
            .map(TypedValue::to_store_string)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push_decoded(&mut self, raw: &str) -> Result<(), ParseError> {
        self.push(Field::Write(T::from_store_string(raw)?));
        Ok(())
    }
}

/// Type-erased view of a `Vec<R: Record>`.
pub trait RecordSeq: Send {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Record> RecordSeq for Vec<R> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Declare the field table of a record type.
///
/// Each entry is `field: kind => "template"`, where kind is one of
/// `leaf`, `nested`, `collection` or `records`. Entries are walked in the
/// order given.
///
/// ```rust
/// use pathbind_core::{record, IdField, TextField};
///
/// #[derive(Default)]
/// struct Tagged {
///     name: TextField,
///     ids: Vec<IdField>,
/// }
///
/// record!(Tagged {
///     name: leaf => "/tagged/:var/name",
///     ids: collection => "/tagged/:var/ids",
/// });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident : $kind:ident => $template:expr),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields(&mut self) -> ::std::vec::Vec<$crate::FieldEntry<'_>> {
                ::std::vec![
                    $($crate::FieldEntry::$kind($template, &mut self.$field)),*
                ]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{IntField, TextField};

    #[derive(Default)]
    struct Inner {
        count: IntField,
    }

    #[derive(Default)]
    struct Outer {
        name: TextField,
        inner: Inner,
        tags: Vec<TextField>,
        children: Vec<Inner>,
        _unmapped: u8,
    }

    record!(Inner {
        count: leaf => ":@/count",
    });

    record!(Outer {
        name: leaf => "/o/name",
        inner: nested => "/o/inner",
        tags: collection => "/o/tags",
        children: records => "/o/children",
    });

    #[test]
    fn macro_lists_fields_in_order() {
        let mut outer = Outer::default();
        let fields = outer.fields();
        let templates: Vec<&str> = fields.iter().map(|f| f.template).collect();
        assert_eq!(templates, vec!["/o/name", "/o/inner", "/o/tags", "/o/children"]);

        assert!(matches!(fields[0].slot, Slot::Leaf(_)));
        assert!(matches!(fields[1].slot, Slot::Nested(_)));
        assert!(matches!(fields[2].slot, Slot::Collection(_)));
        assert!(matches!(fields[3].slot, Slot::Records(_)));
    }

    #[test]
    fn value_slot_roundtrip() {
        let mut f: IntField = Field::write(7);
        let slot: &mut dyn ValueSlot = &mut f;
        assert_eq!(slot.intent(), Some(Intent::Write));
        assert_eq!(slot.encode().as_deref(), Some("7"));

        slot.decode("-3").unwrap();
        assert_eq!(f, Field::Write(-3));
    }

    #[test]
    fn value_slot_decode_failure_leaves_field() {
        let mut f: IntField = Field::fetch();
        let slot: &mut dyn ValueSlot = &mut f;
        assert!(slot.decode("nope").is_err());
        assert_eq!(f, Field::Fetch);
    }

    #[test]
    fn value_slot_reset() {
        let mut f: TextField = Field::write("x");
        ValueSlot::reset(&mut f);
        assert!(f.is_absent());
        assert_eq!(ValueSlot::encode(&f), None);
    }

    #[test]
    fn collection_slot_access() {
        let mut tags: Vec<TextField> = vec![Field::write("a"), Field::delete()];
        let slot: &mut dyn CollectionSlot = &mut tags;
        assert_eq!(slot.len(), 2);
        assert_eq!(slot.intent_at(0), Some(Intent::Write));
        assert_eq!(slot.encode_at(0).as_deref(), Some("a"));
        assert_eq!(slot.intent_at(1), Some(Intent::Delete));
        assert_eq!(slot.encode_at(1), None);
        assert_eq!(slot.intent_at(5), None);

        slot.clear();
        slot.push_decoded("b").unwrap();
        assert_eq!(tags, vec![Field::Write("b".to_string())]);
    }

    #[test]
    fn record_seq_len() {
        let mut children = vec![Inner::default(), Inner::default()];
        let seq: &mut dyn RecordSeq = &mut children;
        assert_eq!(seq.len(), 2);
        assert!(!seq.is_empty());
    }
}
