use tenant_guard::lru_cache::LruCache;
use tenant_guard::CacheError;

#[test]
fn test_new_cache_is_empty() {
    let cache: LruCache<String, u32> = LruCache::new(4);
    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.capacity(), 4);
}

#[test]
fn test_put_and_get() {
    let mut cache = LruCache::new(3);
    cache.put("foo".to_string(), 1).unwrap();
    cache.put("bar".to_string(), 2).unwrap();

    assert_eq!(cache.get(&"foo".to_string()), Some(&1));
    assert_eq!(cache.get(&"bar".to_string()), Some(&2));
    assert_eq!(cache.get(&"baz".to_string()), None);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_put_existing_key_updates_value() {
    let mut cache = LruCache::new(2);
    cache.put("foo", 1).unwrap();
    cache.put("foo", 10).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.peek(&"foo"), Some(&10));
}

#[test]
fn test_put_new_key_into_full_cache_fails() {
    let mut cache = LruCache::new(2);
    cache.put("a", 1).unwrap();
    cache.put("b", 2).unwrap();

    assert_eq!(cache.put("c", 3), Err(CacheError::NoCapacity { capacity: 2 }));
    assert_eq!(cache.peek(&"c"), None);

    // Updating an existing key still works when full
    assert_eq!(cache.put("a", 100), Ok(()));
    assert_eq!(cache.peek(&"a"), Some(&100));
}

#[test]
fn test_evict_removes_least_recently_used() {
    let mut cache = LruCache::new(3);
    cache.put("a", 1).unwrap();
    cache.put("b", 2).unwrap();
    cache.put("c", 3).unwrap();

    assert_eq!(cache.evict(), Some(("a", 1)));
    assert_eq!(cache.evict(), Some(("b", 2)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_get_moves_entry_to_back() {
    let mut cache = LruCache::new(3);
    cache.put("a", 1).unwrap();
    cache.put("b", 2).unwrap();
    cache.put("c", 3).unwrap();

    cache.get(&"a");
    assert_eq!(cache.evict(), Some(("b", 2)));
    assert_eq!(cache.evict(), Some(("c", 3)));
    assert_eq!(cache.evict(), Some(("a", 1)));
}

#[test]
fn test_update_moves_entry_to_back() {
    let mut cache = LruCache::new(3);
    cache.put("a", 1).unwrap();
    cache.put("b", 2).unwrap();
    cache.put("a", 11).unwrap();

    assert_eq!(cache.evict(), Some(("b", 2)));
    assert_eq!(cache.evict(), Some(("a", 11)));
}

#[test]
fn test_peek_does_not_change_order() {
    let mut cache = LruCache::new(2);
    cache.put("a", 1).unwrap();
    cache.put("b", 2).unwrap();

    assert_eq!(cache.peek(&"a"), Some(&1));
    assert_eq!(cache.evict(), Some(("a", 1)));
}

#[test]
fn test_evict_on_empty_cache() {
    let mut cache: LruCache<&str, u32> = LruCache::new(2);
    assert_eq!(cache.evict(), None);

    cache.put("a", 1).unwrap();
    cache.clear();
    assert_eq!(cache.evict(), None);
    assert!(cache.is_empty());
}

#[test]
fn test_clear_frees_capacity() {
    let mut cache = LruCache::new(1);
    cache.put("a", 1).unwrap();
    assert!(cache.put("b", 2).is_err());

    cache.clear();
    assert_eq!(cache.put("b", 2), Ok(()));
    assert_eq!(cache.get(&"b"), Some(&2));
}

#[test]
fn test_zero_capacity_rejects_inserts() {
    let mut cache = LruCache::new(0);
    assert_eq!(cache.put("a", 1), Err(CacheError::NoCapacity { capacity: 0 }));
    assert!(cache.is_empty());
}

#[test]
fn test_evict_then_put_in_steady_state() {
    let mut cache = LruCache::new(2);
    for i in 0..10u32 {
        if cache.len() == cache.capacity() {
            cache.evict();
        }
        cache.put(i, i * 10).unwrap();
    }
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.peek(&8), Some(&80));
    assert_eq!(cache.peek(&9), Some(&90));
    assert_eq!(cache.peek(&7), None);
}

#[test]
fn test_error_display() {
    assert_eq!(
        CacheError::NoCapacity { capacity: 3 }.to_string(),
        "cache is full: capacity 3"
    );
}
