use std::sync::{Arc, Mutex};

use test_log::test;

use crate::mem::NamespaceCache;
use crate::tests::Key;
use crate::CacheStats;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct Params {
    variety: String,
    value: usize,
}

#[test]
fn generates_once_per_key() {
    let mut cache = NamespaceCache::new();
    let num_gen = Arc::new(Mutex::new(0));

    let counted = |key: &Key| {
        *num_gen.lock().unwrap() += 1;
        key.generate()
    };

    let a = cache.generate("keys", Key(1), counted).unwrap();
    let b = cache.generate("keys", Key(1), counted).unwrap();
    let c = cache.generate("keys", Key(2), counted).unwrap();

    assert_eq!(*a, 10);
    assert_eq!(*c, 20);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(*num_gen.lock().unwrap(), 2);
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 2,
            evictions: 0,
        }
    );
}

#[test]
fn errors_are_not_cached() {
    let mut cache = NamespaceCache::new();
    let num_gen = Arc::new(Mutex::new(0));
    let counted = |key: &Key| {
        *num_gen.lock().unwrap() += 1;
        key.generate()
    };

    assert!(cache.generate("keys", Key(5), counted).is_err());
    assert!(cache.generate("keys", Key(5), counted).is_err());
    assert_eq!(*num_gen.lock().unwrap(), 2);
    assert!(cache.is_empty());
}

#[test]
fn namespaces_are_independent() {
    let mut cache = NamespaceCache::new();
    let params = Params {
        variety: "idt".to_string(),
        value: 3,
    };

    let a = cache
        .generate("first", params.clone(), |p| -> anyhow::Result<usize> {
            Ok(p.value)
        })
        .unwrap();
    let b = cache
        .generate("second", params.clone(), |p| -> anyhow::Result<usize> {
            Ok(p.value + 1)
        })
        .unwrap();

    assert_eq!(*a, 3);
    assert_eq!(*b, 4);
    assert_eq!(cache.len(), 2);
}

#[test]
fn insert_keeps_existing_entry() {
    let mut cache = NamespaceCache::new();
    let first = cache.insert("ns", 1u64, "first".to_string());
    let second = cache.insert("ns", 1u64, "second".to_string());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*second, "first");
}

#[test]
fn bounded_cache_evicts_least_recently_used() {
    let mut cache = NamespaceCache::with_capacity(Some(2));
    for i in 0..2 {
        cache.generate("keys", Key(i), Key::generate).unwrap();
    }
    // Touch key 0 so key 1 becomes the eviction candidate.
    assert!(cache.get::<Key, u64>("keys", &Key(0)).is_some());
    cache.generate("keys", Key(3), Key::generate).unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().evictions, 1);
    assert!(cache.get::<Key, u64>("keys", &Key(0)).is_some());
    assert!(cache.get::<Key, u64>("keys", &Key(1)).is_none());
}

#[test]
fn clear_resets_entries_and_stats() {
    let mut cache = NamespaceCache::new();
    cache.generate("keys", Key(1), Key::generate).unwrap();
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats(), CacheStats::default());
}

#[test]
#[should_panic]
fn panics_on_mismatched_namespace_types() {
    let mut cache = NamespaceCache::new();
    cache.insert("ns", Key(1), 10u64);
    cache.insert("ns", Key(1), "ten".to_string());
}
