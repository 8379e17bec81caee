//! TTL cache for search responses

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// A concurrent map of cached values with per-entry expiry
pub struct TtlCache<V> {
    entries: DashMap<String, (Instant, V)>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fetch a live entry; expired entries are removed on the way out
    pub fn get(&self, key: &str) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            let (stored_at, value) = entry.value();
            if stored_at.elapsed() < self.ttl {
                return Some(value.clone());
            }
        }
        self.entries.remove(key);
        None
    }

    /// Store a value, sweeping out entries past their TTL so stale keys
    /// that are never fetched again do not accumulate
    pub fn insert(&self, key: String, value: V) {
        let ttl = self.ttl;
        self.entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        self.entries.insert(key, (Instant::now(), value));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get() {
        let cache = TtlCache::new(Duration::from_secs(300));
        cache.insert("brake".into(), 42);
        assert_eq!(cache.get("brake"), Some(42));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_expired_entry_evicted() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("brake".into(), 42);
        assert_eq!(cache.get("brake"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stale_keys_swept_on_insert() {
        let cache = TtlCache::new(Duration::ZERO);
        for i in 0..100 {
            cache.insert(format!("query-{}", i), i);
        }
        // Every insert purges the previous, already-expired entries.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = TtlCache::new(Duration::from_secs(300));
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
