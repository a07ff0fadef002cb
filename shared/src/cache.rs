//! In-process TTL cache for upstream market data
//!
//! Entries carry their insertion instant; freshness is an explicit check
//! against a caller-supplied "now", so expiry is testable without
//! touching the filesystem or sleeping. Stale entries are kept until
//! overwritten; the market client falls back to them when a live fetch
//! fails.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Fresh value, or `None` when missing or past its TTL.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(self.ttl, now))
            .map(|entry| &entry.value)
    }

    /// Value regardless of freshness, for degraded reads.
    pub fn get_stale(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
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
    fn fresh_entry_is_returned() {
        let mut cache = TtlCache::new(Duration::from_secs(3600));
        let now = Instant::now();
        cache.insert_at("2330", vec![1.0, 2.0], now);
        assert_eq!(cache.get_at(&"2330", now), Some(&vec![1.0, 2.0]));
    }

    #[test]
    fn expired_entry_is_hidden_but_stale_readable() {
        let mut cache = TtlCache::new(Duration::from_secs(3600));
        let now = Instant::now();
        cache.insert_at("2330", 42, now);

        let later = now + Duration::from_secs(3601);
        assert_eq!(cache.get_at(&"2330", later), None);
        assert_eq!(cache.get_stale(&"2330"), Some(&42));
    }

    #[test]
    fn expiry_boundary_is_exclusive_of_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        let now = Instant::now();
        cache.insert_at("k", 1, now);
        assert!(cache.get_at(&"k", now + Duration::from_secs(59)).is_some());
        assert!(cache.get_at(&"k", now + Duration::from_secs(60)).is_none());
    }

    #[test]
    fn reinsert_refreshes_entry() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        let now = Instant::now();
        cache.insert_at("k", 1, now);
        cache.insert_at("k", 2, now + Duration::from_secs(120));
        assert_eq!(cache.get_at(&"k", now + Duration::from_secs(130)), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_key() {
        let cache: TtlCache<&str, i32> = TtlCache::new(Duration::from_secs(60));
        assert!(cache.get(&"absent").is_none());
        assert!(cache.get_stale(&"absent").is_none());
        assert!(cache.is_empty());
    }
}
