//! Flat parameter dictionaries.

use std::ops::Index;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::Value;
use crate::error::Result;

/// The flat, string-keyed form of a part's whole parameter tree.
///
/// Keys concatenate the component labels on the path to a parameter with the
/// parameter's own label, e.g. `AnchorSizeX`. The synthetic `Type` key holds the
/// type name of the exporting part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatParams(IndexMap<String, Value>);

impl FlatParams {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The exporting part's type name, if recorded.
    pub fn type_name(&self) -> Option<&str> {
        self.get("Type").and_then(|v| v.as_str()).map(|s| s.as_str())
    }

    /// Merges `other` into `self`, prefixing each of its keys with `prefix`.
    ///
    /// Bookkeeping keys of `other` are dropped.
    pub fn extend_prefixed(&mut self, prefix: &str, other: FlatParams) {
        for (key, value) in other.0 {
            if super::is_bookkeeping(&key) {
                continue;
            }
            self.0.insert(format!("{prefix}{key}"), value);
        }
    }

    /// Returns a copy without the bookkeeping keys.
    pub fn without_bookkeeping(&self) -> FlatParams {
        FlatParams(
            self.0
                .iter()
                .filter(|(k, _)| !super::is_bookkeeping(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Serializes the dictionary as a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a dictionary from a JSON object.
    ///
    /// ```
    /// use pirel::params::{FlatParams, Value};
    ///
    /// let params = FlatParams::from_json(r#"{"IDTPitch": 8.0, "IDTN": 40}"#).unwrap();
    /// assert_eq!(params.get("IDTPitch"), Some(&Value::Float(8.)));
    /// assert_eq!(params.get("IDTN"), Some(&Value::Int(40)));
    /// ```
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Index<&str> for FlatParams {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        &self.0[key]
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FlatParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        FlatParams(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FlatParams {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlatParams {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
