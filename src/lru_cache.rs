//! Fixed-capacity key/value store with least-recently-used eviction.
//!
//! The cache is independent of the limiters. Inserting a new key into a full
//! cache is refused rather than evicting silently; callers decide when to
//! [`evict`](LruCache::evict).

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::error::CacheError;

/// Capacity-bounded cache ordered by last use.
///
/// Both [`put`](Self::put) and [`get`](Self::get) mark the key as most
/// recently used. The capacity is fixed at construction.
///
/// # Example
///
/// ```rust
/// use tenant_guard::lru_cache::LruCache;
///
/// let mut cache = LruCache::new(2);
/// cache.put("a", 1).unwrap();
/// cache.put("b", 2).unwrap();
///
/// // Touch "a" so that "b" becomes the oldest entry
/// assert_eq!(cache.get(&"a"), Some(&1));
/// assert!(cache.put("c", 3).is_err());
///
/// assert_eq!(cache.evict(), Some(("b", 2)));
/// cache.put("c", 3).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, CacheEntry<V>>,
    /// Use stamp to key; the first entry is the least recently used.
    order: BTreeMap<u64, K>,
    next_stamp: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stamp: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A zero capacity is allowed; such a cache refuses every insert.
    pub fn new(capacity: usize) -> Self {
        LruCache {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: BTreeMap::new(),
            next_stamp: 0,
        }
    }

    /// Inserts `value` under `key`, or replaces the existing value, and marks
    /// `key` as most recently used.
    ///
    /// # Returns
    /// * `Err(CacheError::NoCapacity)` - `key` is new and the cache is full
    pub fn put(&mut self, key: K, value: V) -> Result<(), CacheError> {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            self.order.remove(&entry.stamp);
            entry.stamp = self.next_stamp;
            self.order.insert(self.next_stamp, key);
            self.next_stamp += 1;
            return Ok(());
        }

        if self.entries.len() >= self.capacity {
            return Err(CacheError::NoCapacity {
                capacity: self.capacity,
            });
        }

        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.order.insert(stamp, key.clone());
        self.entries.insert(key, CacheEntry { value, stamp });
        Ok(())
    }

    /// Looks up `key` and marks it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let entry = self.entries.get_mut(key)?;
        self.order.remove(&entry.stamp);
        entry.stamp = self.next_stamp;
        self.order.insert(self.next_stamp, key.clone());
        self.next_stamp += 1;
        Some(&entry.value)
    }

    /// Looks up `key` without changing its position.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Removes and returns the least recently used entry, if any.
    pub fn evict(&mut self) -> Option<(K, V)> {
        let (_, key) = self.order.pop_first()?;
        let entry = self.entries.remove(&key)?;
        tracing::trace!(remaining = self.entries.len(), "lru entry evicted");
        Some((key, entry.value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.next_stamp = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_and_entries_stay_in_sync() {
        let mut cache = LruCache::new(3);
        cache.put(1, "one").unwrap();
        cache.put(2, "two").unwrap();
        cache.put(1, "uno").unwrap();
        cache.get(&2);
        assert_eq!(cache.order.len(), cache.entries.len());
        assert_eq!(cache.order.values().collect::<Vec<_>>(), vec![&1, &2]);
    }

    #[test]
    fn clear_restarts_use_stamps() {
        let mut cache = LruCache::new(2);
        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        cache.get(&"a");
        cache.clear();
        assert_eq!(cache.next_stamp, 0);

        cache.put("c", 3).unwrap();
        cache.put("d", 4).unwrap();
        assert_eq!(cache.order.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(cache.evict(), Some(("c", 3)));
    }
}
