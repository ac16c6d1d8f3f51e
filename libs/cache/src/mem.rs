//! In-memory caching utilities.

use std::{
    any::{type_name, Any},
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    sync::Arc,
};

use crate::{lru::LruStore, CacheStats};

type Store<K, V> = LruStore<K, Arc<V>>;

/// A cache of generated values, partitioned by namespace.
///
/// Each namespace maps keys of one type `K` to values of one type `V`. Values are
/// returned as shared [`Arc`]s: two lookups of equal keys hand out the same allocation,
/// so callers must treat cached values as read-only.
///
/// # Examples
///
/// ```
/// use cache::mem::NamespaceCache;
///
/// let mut cache = NamespaceCache::new();
///
/// fn generate_fn(tuple: &(u64, u64)) -> Result<u64, ()> {
///     Ok(tuple.0 + tuple.1)
/// }
///
/// let a = cache.generate("adder", (5, 6), generate_fn).unwrap();
/// assert_eq!(*a, 11);
///
/// // Does not call the generator again as the result has been cached.
/// let b = cache.generate("adder", (5, 6), |_: &(u64, u64)| -> Result<u64, ()> {
///     unreachable!()
/// }).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[derive(Default)]
pub struct NamespaceCache {
    /// A map from namespace to a type-erased `LruStore<K, Arc<V>>`.
    stores: HashMap<String, Box<dyn ErasedStore>>,
    /// The capacity applied to every namespace.
    capacity: Option<usize>,
    stats: CacheStats,
}

impl Debug for NamespaceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceCache")
            .field("namespaces", &self.stores.keys().collect::<Vec<_>>())
            .field("capacity", &self.capacity)
            .field("stats", &self.stats)
            .finish()
    }
}

impl NamespaceCache {
    /// Creates a new unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache holding at most `capacity` entries per namespace.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is `Some(0)`.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        assert_ne!(capacity, Some(0), "cache capacity must be nonzero");
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// The per-namespace capacity, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Usage counters accumulated since creation or the last [`NamespaceCache::clear`].
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The total number of cached entries across all namespaces.
    pub fn len(&self) -> usize {
        self.stores.values().map(|store| store.len()).sum()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached entry and resets the usage counters.
    pub fn clear(&mut self) {
        self.stores.clear();
        self.stats = CacheStats::default();
    }

    fn store_mut<K, V>(&mut self, namespace: &str) -> &mut Store<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let capacity = self.capacity;
        self.stores
            .entry(namespace.to_string())
            .or_insert_with(|| -> Box<dyn ErasedStore> { Box::new(Store::<K, V>::new(capacity)) })
            .as_any_mut()
            .downcast_mut::<Store<K, V>>()
            .unwrap_or_else(|| {
                panic!(
                    "namespace `{namespace}` is already associated with different key/value types (requested {} -> {})",
                    type_name::<K>(),
                    type_name::<V>(),
                )
            })
    }

    /// Returns the cached value for `key`, if present.
    ///
    /// # Panics
    ///
    /// Panics if `namespace` already holds keys or values of different types.
    pub fn get<K, V>(&mut self, namespace: &str, key: &K) -> Option<Arc<V>>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let value = self.store_mut::<K, V>(namespace).get(key).cloned();
        if value.is_some() {
            self.stats.hits += 1;
            tracing::trace!(namespace, "cache hit");
        } else {
            self.stats.misses += 1;
            tracing::trace!(namespace, "cache miss");
        }
        value
    }

    /// Inserts `value` under `key`, returning the canonical cached value.
    ///
    /// If an entry for `key` already exists it is kept, and the existing value is
    /// returned instead of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `namespace` already holds keys or values of different types.
    pub fn insert<K, V>(&mut self, namespace: &str, key: K, value: V) -> Arc<V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.insert_arc(namespace, key, Arc::new(value))
    }

    /// Like [`NamespaceCache::insert`], but for a value that is already shared.
    pub fn insert_arc<K, V>(&mut self, namespace: &str, key: K, value: Arc<V>) -> Arc<V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let store = self.store_mut::<K, V>(namespace);
        if let Some(existing) = store.get(&key) {
            return existing.clone();
        }
        let evicted = store.insert(key, value.clone());
        if evicted > 0 {
            tracing::debug!(namespace, evicted, "evicted least recently used entries");
            self.stats.evictions += evicted as u64;
        }
        value
    }

    /// Returns the cached value for `key`, calling `generate_fn` to produce it on a miss.
    ///
    /// Errors are returned to the caller and are not cached, so a later call with the
    /// same key retries generation.
    ///
    /// # Panics
    ///
    /// Panics if `namespace` already holds keys or values of different types.
    pub fn generate<K, V, E>(
        &mut self,
        namespace: &str,
        key: K,
        generate_fn: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<Arc<V>, E>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        if let Some(value) = self.get::<K, V>(namespace, &key) {
            return Ok(value);
        }
        let value = generate_fn(&key)?;
        Ok(self.insert(namespace, key, value))
    }
}

/// A type-erased namespace store.
trait ErasedStore: Send + Sync {
    fn len(&self) -> usize;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<K, V> ErasedStore for Store<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn len(&self) -> usize {
        LruStore::len(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
