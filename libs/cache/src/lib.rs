//! A namespaced in-memory memoization store.
//!
//! Values are generated at most once per `(namespace, key)` pair and handed out as
//! shared [`Arc`](std::sync::Arc)s. Each namespace may optionally be bounded, in which
//! case the least recently used entries are evicted first.
#![warn(missing_docs)]

pub mod lru;
pub mod mem;
#[cfg(test)]
pub(crate) mod tests;

/// Counters describing how a cache has been used.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an existing entry.
    pub hits: u64,
    /// Lookups that did not find an entry.
    pub misses: u64,
    /// Entries dropped to respect a capacity bound.
    pub evictions: u64,
}
