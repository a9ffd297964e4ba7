//! Path templates and the variables that fill them.
//!
//! A template is a `/`-separated key pattern. A segment starting with `:`
//! names a variable, replaced by its value at resolve time:
//!
//! ```rust
//! use pathbind_core::{resolve, PathVars};
//!
//! let vars = PathVars::new().with("x", "5");
//! assert_eq!(resolve("/a/:x/b", &vars, false).unwrap(), "/a/5/b");
//! ```
//!
//! The reserved variable `:@` stands for the key already resolved by the
//! enclosing record, which lets a nested record build its keys under its
//! parent's.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Marks a variable segment.
pub const VARIABLE_MARKER: char = ':';

/// Name of the variable holding the enclosing record's resolved key.
pub const ACCUMULATOR: &str = "@";

/// Separator between key segments.
pub const SEPARATOR: char = '/';

/// Variable values for template resolution.
///
/// Supplied by the caller of `get`/`set`. The mapper works on its own copy,
/// so the caller's table is never modified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathVars {
    vars: BTreeMap<String, String>,
}

impl PathVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a variable, returning its previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The enclosing record's resolved key, if one is set.
    pub fn accumulated(&self) -> Option<&str> {
        self.get(ACCUMULATOR)
    }
}

impl From<BTreeMap<String, String>> for PathVars {
    fn from(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolve a template against `vars`.
///
/// `inside_collection` is true while resolving the key of a collection
/// element; those may not refer to `:@`, since only the collection's own
/// key carries the enclosing record's path.
///
/// Substitution is purely textual. Resolved values are not escaped or
/// validated, so a value containing `/` adds segments to the key.
///
/// # Errors
///
/// * `InvalidArgument` - the template is empty or has a bare `:` segment.
/// * `MissingVariable` - a referenced variable is not in `vars`.
/// * `InvalidContext` - `:@` is referenced inside a collection.
pub fn resolve(template: &str, vars: &PathVars, inside_collection: bool) -> Result<String> {
    if template.is_empty() {
        return Err(Error::InvalidArgument {
            message: "empty path template".to_string(),
        });
    }

    let mut segments = Vec::new();
    for segment in template.split(SEPARATOR) {
        let Some(name) = segment.strip_prefix(VARIABLE_MARKER) else {
            segments.push(segment);
            continue;
        };

        if name.is_empty() {
            return Err(Error::InvalidArgument {
                message: format!("unnamed variable in path template {:?}", template),
            });
        }
        if name == ACCUMULATOR && inside_collection {
            return Err(Error::InvalidContext {
                template: template.to_string(),
                message: "cannot use :@ inside a collection".to_string(),
            });
        }

        let value = vars.get(name).ok_or_else(|| Error::MissingVariable {
            name: name.to_string(),
            template: template.to_string(),
        })?;
        segments.push(value);
    }

    Ok(segments.join("/"))
}
