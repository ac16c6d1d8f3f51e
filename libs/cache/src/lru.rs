//! A least-recently-used map.

use std::hash::Hash;

use indexmap::IndexMap;

/// A map that remembers access order and optionally bounds its size.
///
/// Entries are kept in recency order: the front of the map is the least
/// recently used entry.
#[derive(Debug, Clone)]
pub struct LruStore<K, V> {
    entries: IndexMap<K, V>,
    capacity: Option<usize>,
}

impl<K: Hash + Eq, V> LruStore<K, V> {
    /// Creates a new store holding at most `capacity` entries.
    ///
    /// A capacity of [`None`] means the store is unbounded.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is `Some(0)`.
    pub fn new(capacity: Option<usize>) -> Self {
        assert_ne!(capacity, Some(0), "an LRU store must hold at least one entry");
        Self {
            entries: IndexMap::new(),
            capacity,
        }
    }

    /// The maximum number of entries, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// The number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value for `key`, marking it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get_index(last).map(|(_, v)| v)
    }

    /// Returns `true` if `key` is present, without touching recency.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a value as the most recently used entry.
    ///
    /// Returns the number of entries evicted to make room.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        let (index, _) = self.entries.insert_full(key, value);
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        let mut evicted = 0;
        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                self.entries.shift_remove_index(0);
                evicted += 1;
            }
        }
        evicted
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::LruStore;

    #[test]
    fn evicts_least_recently_used() {
        let mut store = LruStore::new(Some(2));
        store.insert("a", 1);
        store.insert("b", 2);
        assert_eq!(store.get(&"a"), Some(&1));
        assert_eq!(store.insert("c", 3), 1);
        assert!(store.contains(&"a"));
        assert!(!store.contains(&"b"));
        assert_eq!(store.keys().copied().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn unbounded_store_never_evicts() {
        let mut store = LruStore::new(None);
        for i in 0..100 {
            assert_eq!(store.insert(i, i), 0);
        }
        assert_eq!(store.len(), 100);
    }
}
