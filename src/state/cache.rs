use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Key-value store whose entries expire a fixed time after insertion.
///
/// Expired entries are invisible to `get` but stay in memory until
/// overwritten or purged. The `*_at` variants take the clock as an argument.
#[derive(Debug, Clone)]
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

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| &entry.value)
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

    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// Drop every entry expired at `now`; returns how many went.
    pub fn purge_expired_at(&mut self, now: Instant) -> usize {
        if self.is_empty() {
            return 0;
        }
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
        before - self.entries.len()
    }

    /// Entries stored, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entries_are_returned() {
        let start = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert_at("2023-24".to_string(), 450usize, start);

        let later = start + Duration::from_secs(59);
        assert_eq!(cache.get_at(&"2023-24".to_string(), later), Some(&450));
        assert_eq!(cache.get_at(&"2022-23".to_string(), later), None);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let start = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert_at(203954u32, "career", start);

        assert_eq!(cache.get_at(&203954, start + Duration::from_secs(60)), None);
        assert_eq!(cache.len(), 1, "expired entries linger until purged");
    }

    #[test]
    fn insert_refreshes_expiry() {
        let start = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(10));
        cache.insert_at(1u32, "old", start);
        cache.insert_at(1u32, "new", start + Duration::from_secs(8));

        assert_eq!(cache.get_at(&1, start + Duration::from_secs(15)), Some(&"new"));
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let start = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(10));
        cache.insert_at(1u32, 'a', start);
        cache.insert_at(2u32, 'b', start + Duration::from_secs(5));

        let removed = cache.purge_expired_at(start + Duration::from_secs(12));
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at(&2, start + Duration::from_secs(12)), Some(&'b'));
    }

    #[test]
    fn clock_going_backwards_does_not_expire() {
        let start = Instant::now() + Duration::from_secs(100);
        let mut cache = TtlCache::new(Duration::from_secs(10));
        cache.insert_at(1u32, 1u8, start);
        assert_eq!(cache.get_at(&1, start - Duration::from_secs(50)), Some(&1));
    }
}
