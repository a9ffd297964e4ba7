//! Fields: a scalar slot tagged with what to do with it.

use chrono::{DateTime, Utc};

use crate::value::{Blob, Identifier};

/// What a call should do with a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Load the stored value into the field.
    Fetch,
    /// Store the field's value.
    Write,
    /// Remove the stored value.
    Delete,
}

/// A scalar field of a record.
///
/// The variant is the field's intent. `Absent` means "no value and nothing
/// to do": it is skipped by both `get` and `set`, and it is what a fetched
/// field becomes when its key does not exist.
///
/// A successful fetch leaves the field as `Write(value)`, so a loaded
/// record can be modified and set again directly.
///
/// # Example
///
/// ```rust
/// use pathbind_core::{Field, Intent};
///
/// let name: Field<String> = Field::write("Alice");
/// assert!(name.is_set());
/// assert_eq!(name.value().map(String::as_str), Some("Alice"));
///
/// let count: Field<u64> = Field::fetch();
/// assert_eq!(count.intent(), Some(Intent::Fetch));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Field<T> {
    #[default]
    Absent,
    Fetch,
    Write(T),
    Delete,
}

impl<T> Field<T> {
    /// A field to be loaded by `get`.
    pub fn fetch() -> Self {
        Field::Fetch
    }

    /// A field to be stored by `set`.
    pub fn write(value: impl Into<T>) -> Self {
        Field::Write(value.into())
    }

    /// A field to be removed by `set`.
    pub fn delete() -> Self {
        Field::Delete
    }

    pub fn absent() -> Self {
        Field::Absent
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Field::Fetch)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Field::Write(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Field::Delete)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// The intent, or `None` for an absent field.
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Field::Absent => None,
            Field::Fetch => Some(Intent::Fetch),
            Field::Write(_) => Some(Intent::Write),
            Field::Delete => Some(Intent::Delete),
        }
    }

    /// The held value, if the field is `Write`.
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Write(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Field::Write(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Field::Absent, Field::Write)
    }
}

pub type TimeField = Field<DateTime<Utc>>;
pub type IdField = Field<Identifier>;
pub type TextField = Field<String>;
pub type IntField = Field<i64>;
pub type UintField = Field<u64>;
pub type BoolField = Field<bool>;
pub type BytesField = Field<Blob>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_intent() {
        let f: TextField = Field::write("x");
        assert!(f.is_set());
        assert!(!f.is_get());
        assert!(!f.is_delete());
        assert_eq!(f.intent(), Some(Intent::Write));
    }

    #[test]
    fn fetch_intent() {
        let f: IntField = Field::fetch();
        assert!(f.is_get());
        assert!(!f.is_set());
        assert!(!f.is_delete());
        assert_eq!(f.value(), None);
    }

    #[test]
    fn delete_intent() {
        let f: BoolField = Field::delete();
        assert!(f.is_delete());
        assert!(!f.is_set());
        assert!(!f.is_get());
    }

    #[test]
    fn absent_is_nothing() {
        let f: UintField = Field::default();
        assert!(f.is_absent());
        assert!(!f.is_set());
        assert!(!f.is_get());
        assert!(!f.is_delete());
        assert_eq!(f.intent(), None);
    }

    #[test]
    fn from_option() {
        assert_eq!(IntField::from(Some(3)), Field::Write(3));
        assert_eq!(IntField::from(None), Field::Absent);
    }

    #[test]
    fn into_value() {
        let f: IdField = Field::write("abc");
        assert_eq!(f.into_value(), Some(Identifier::new("abc")));
        assert_eq!(IdField::delete().into_value(), None);
    }
}
