//! Collection envelope decoding.
//!
//! The backend returns lists either bare (`[...]`) or wrapped under a named
//! field (`{"courses": [...]}`). Decoding tries, in order:
//!
//! 1. a bare JSON array
//! 2. an object whose `key` field is an array
//! 3. anything else, kept untouched as [`Collection::Raw`]

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Items(Vec<Value>),
    /// Body matched neither list shape.
    Raw(Value),
}

impl Collection {
    /// Items in the collection. `Raw` bodies have none.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        match self {
            Self::Items(items) => items,
            Self::Raw(_) => &[],
        }
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Items(items) => items,
            Self::Raw(_) => Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

#[must_use]
pub fn unwrap_collection(body: Value, key: &str) -> Collection {
    match body {
        Value::Array(items) => Collection::Items(items),
        Value::Object(mut map) if map.get(key).is_some_and(Value::is_array) => match map.remove(key) {
            Some(Value::Array(items)) => Collection::Items(items),
            _ => Collection::Raw(Value::Object(map)),
        },
        other => Collection::Raw(other),
    }
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
