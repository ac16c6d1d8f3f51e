//! Caching utilities.

use std::sync::{Arc, Mutex};

use arcstr::ArcStr;
use cache::{mem::NamespaceCache, CacheStats};
use geometry::point::normalized_bits;

use crate::layout::Cell;
use crate::params::Value;
use crate::part::LayoutPart;

/// A hashable snapshot of one parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// The bit pattern of a float, with negative zero folded into zero.
    Float(u64),
    /// A string.
    Str(ArcStr),
    /// The bit patterns of a point's coordinates.
    Point(u64, u64),
    /// A port as `(name, center, width, orientation)`.
    Port {
        /// The port name.
        name: ArcStr,
        /// The bit patterns of the port center.
        center: (u64, u64),
        /// The bit pattern of the port width.
        width: u64,
        /// The bit pattern of the port orientation.
        orientation: u64,
    },
    /// A sequence of values.
    List(Vec<KeyValue>),
}

impl From<&Value> for KeyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(v) => KeyValue::Bool(*v),
            Value::Int(v) => KeyValue::Int(*v),
            Value::Float(v) => KeyValue::Float(normalized_bits(*v)),
            Value::Str(v) => KeyValue::Str(v.clone()),
            Value::Point(p) => {
                let (x, y) = p.to_bits();
                KeyValue::Point(x, y)
            }
            Value::Port(p) => KeyValue::Port {
                name: p.name().clone(),
                center: p.center().to_bits(),
                width: normalized_bits(p.width()),
                orientation: normalized_bits(p.orientation()),
            },
            Value::List(items) => KeyValue::List(items.iter().map(KeyValue::from).collect()),
        }
    }
}

/// The full parameter closure of a part: every parameter of every wrapped level and
/// every component, recursively, keyed by its flat path.
///
/// Instance names are not part of the key, so differently named parts with equal
/// parameters share cached layouts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<(ArcStr, KeyValue)>);

impl CacheKey {
    /// Computes the key of `part` from its current parameter values.
    pub fn of(part: &dyn LayoutPart) -> Self {
        fn collect(part: &dyn LayoutPart, prefix: &str, out: &mut Vec<(ArcStr, KeyValue)>) {
            if let Some(inner) = part.inner() {
                collect(inner, prefix, out);
            }
            for (label, component) in part.components() {
                collect(component, &format!("{prefix}{label}"), out);
            }
            for (decl, value) in part.params().iter() {
                out.push((
                    arcstr::format!("{prefix}{}", decl.label()),
                    KeyValue::from(value),
                ));
            }
        }

        let mut entries = Vec::new();
        collect(part, "", &mut entries);
        Self(entries)
    }

    /// The number of parameters captured by the key.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the key captures no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A shared, thread-safe store of generated layouts, one namespace per part type.
///
/// Cached cells are shared: callers receive the same [`Arc`] for equal keys and must
/// treat cells as read-only.
#[derive(Debug, Clone)]
pub struct Cache {
    inner: Arc<Mutex<NamespaceCache>>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Cache {
    /// Creates a cache holding at most `capacity` layouts per part type.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is `Some(0)`.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NamespaceCache::with_capacity(capacity))),
        }
    }

    /// Returns the cached layout for `key` in `namespace`, if any.
    pub fn get(&self, namespace: &str, key: &CacheKey) -> Option<Arc<Cell>> {
        let mut inner = self.inner.lock().unwrap();
        inner.get::<CacheKey, Cell>(namespace, key)
    }

    /// Stores a layout, returning the canonical cached copy.
    ///
    /// If another caller stored a layout for the same key first, that layout is kept
    /// and returned.
    pub fn insert(&self, namespace: &str, key: CacheKey, cell: Arc<Cell>) -> Arc<Cell> {
        let mut inner = self.inner.lock().unwrap();
        inner.insert_arc(namespace, key, cell)
    }

    /// Usage counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().unwrap().stats()
    }

    /// The number of cached layouts across all part types.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached layout.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }
}
