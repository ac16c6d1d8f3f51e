//! Parameter assignments applied by `set_params`.

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;

use super::flat::FlatParams;
use super::value::Value;
use crate::error::Result;
use crate::part::LayoutPart;

/// A closure computing a parameter value from the part being configured.
pub type DeferredFn = dyn Fn(&dyn LayoutPart) -> Result<Value> + Send + Sync;

/// A shared, deferred parameter value.
#[derive(Clone)]
pub struct Deferred(Arc<DeferredFn>);

impl Deferred {
    /// Creates a deferred value from a closure over the owning part.
    pub fn new(f: impl Fn(&dyn LayoutPart) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Creates a deferred value from a closure taking no arguments.
    pub fn from_fn<V: Into<Value>>(f: impl Fn() -> V + Send + Sync + 'static) -> Self {
        Self(Arc::new(move |_| Ok(f().into())))
    }

    /// Evaluates the closure against `part`.
    pub fn resolve(&self, part: &dyn LayoutPart) -> Result<Value> {
        (self.0)(part)
    }
}

impl Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// A value to assign to a parameter.
#[derive(Debug, Clone)]
pub enum Assignment {
    /// A literal value.
    Value(Value),
    /// A value computed from the owning part at assignment time.
    Deferred(Deferred),
}

impl Assignment {
    /// Produces the concrete value, evaluating deferred closures against `part`.
    pub fn resolve(&self, part: &dyn LayoutPart) -> Result<Value> {
        match self {
            Assignment::Value(v) => Ok(v.clone()),
            Assignment::Deferred(d) => d.resolve(part),
        }
    }
}

impl<V: Into<Value>> From<V> for Assignment {
    fn from(value: V) -> Self {
        Assignment::Value(value.into())
    }
}

impl From<Deferred> for Assignment {
    fn from(value: Deferred) -> Self {
        Assignment::Deferred(value)
    }
}

/// An ordered set of flat-key assignments.
///
/// # Examples
///
/// ```
/// use pirel::params::{ParamAssignments, Value};
/// use pirel::part::LayoutPart;
///
/// let assignments = ParamAssignments::new()
///     .with("IDTPitch", 8.)
///     .with_fn("IDTLength", |part: &dyn LayoutPart| {
///         Ok(Value::Float(part.params().f64("pitch") * 25.))
///     });
/// assert_eq!(assignments.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamAssignments {
    entries: IndexMap<String, Assignment>,
}

impl ParamAssignments {
    /// Creates an empty set of assignments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a literal or deferred assignment.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Assignment>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds an assignment computed from the part that owns the parameter.
    pub fn with_fn(
        self,
        key: impl Into<String>,
        f: impl Fn(&dyn LayoutPart) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.with(key, Deferred::new(f))
    }

    /// Adds or replaces an assignment.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Assignment>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the assignment for `key`.
    pub fn get(&self, key: &str) -> Option<&Assignment> {
        self.entries.get(key)
    }

    /// The number of assignments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the assigned keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Iterates over the assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Assignment)> {
        self.entries.iter()
    }

    /// Returns the assignments whose keys begin with `prefix`, with the prefix removed.
    pub fn strip_prefix(&self, prefix: &str) -> ParamAssignments {
        ParamAssignments {
            entries: self
                .entries
                .iter()
                .filter_map(|(k, v)| {
                    k.strip_prefix(prefix)
                        .filter(|rest| !rest.is_empty())
                        .map(|rest| (rest.to_string(), v.clone()))
                })
                .collect(),
        }
    }
}

impl From<FlatParams> for ParamAssignments {
    fn from(value: FlatParams) -> Self {
        ParamAssignments {
            entries: value
                .into_iter()
                .map(|(k, v)| (k, Assignment::Value(v)))
                .collect(),
        }
    }
}

impl From<&FlatParams> for ParamAssignments {
    fn from(value: &FlatParams) -> Self {
        value.clone().into()
    }
}
