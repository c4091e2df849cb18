//! Generic TTL + LRU cache
//!
//! A fixed-capacity cache where every entry carries an absolute expiry
//! deadline on top of the LRU recency order. Capacity pressure evicts the
//! least recently used entry regardless of its remaining lifetime; expiry
//! is enforced lazily at lookup time. A hit promotes the entry's recency
//! but never extends its deadline, so a hot key still ages out on
//! schedule.
//!
//! Each instance is one mutual-exclusion domain: a `tokio::sync::Mutex`
//! guards the entry table, and counters are atomics readable without the
//! lock. A missing key is `None`, never an error.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use lru::LruCache;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// A cached value plus the deadline after which lookups refuse to see it.
#[derive(Debug, Clone)]
struct TtlEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> TtlEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Point-in-time counters and occupancy for one cache instance.
///
/// Counters are cumulative for the lifetime of the cache; invalidation
/// drops entries but never resets accounting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub size: usize,
    pub max_size: usize,
    /// hits / (hits + misses), 0.0 when the cache has never been queried
    pub hit_rate: f64,
}

/// Fixed-capacity cache with per-entry TTL and LRU eviction.
pub struct TtlCache<K, V> {
    entries: Mutex<LruCache<K, TtlEntry<V>>>,
    ttl: Duration,
    max_size: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(max_size: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(max_size)),
            ttl,
            max_size,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    /// Look up a key. Counts a hit and promotes recency when a fresh entry
    /// exists; counts a miss otherwise. An expired entry is removed here,
    /// counted as both an expiration and a miss.
    pub async fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let expired = match entries.peek(key) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            entries.pop(key);
            self.expirations.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let value = entries.get(key).map(|entry| entry.value.clone());
        self.hits.fetch_add(1, Ordering::Relaxed);
        value
    }

    /// Insert or replace a value with a fresh deadline.
    ///
    /// Inserting a new key into a full cache evicts the current LRU entry
    /// first, even if that entry has lifetime left. Replacing an existing
    /// key resets its deadline and promotes it without any eviction.
    pub async fn put(&self, key: K, value: V) {
        let entry = TtlEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        let mut entries = self.entries.lock().await;
        if let Some((displaced, _)) = entries.push(key.clone(), entry) {
            if displaced != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Presence probe that has no side effects: no counters, no recency
    /// promotion, and expired entries report as absent.
    pub async fn contains(&self, key: &K) -> bool {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Drop every entry. Hit/miss accounting is preserved; only occupancy
    /// goes to zero.
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
    }

    /// Sweep out entries whose deadline has passed, returning how many
    /// were removed. Lookups already expire lazily; this exists for
    /// housekeeping on caches with long idle tails.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let stale: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        self.expirations
            .fetch_add(stale.len() as u64, Ordering::Relaxed);
        stale.len()
    }

    /// Consistent snapshot of counters and occupancy; safe to call
    /// concurrently with any other operation.
    pub async fn stats(&self) -> CacheStats {
        let size = self.entries.lock().await.len();
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        CacheStats {
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            size,
            max_size: self.max_size.get(),
            hit_rate,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn max_size(&self) -> usize {
        self.max_size.get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn cache(capacity: usize, ttl: Duration) -> TtlCache<String, u32> {
        TtlCache::new(NonZeroUsize::new(capacity).unwrap(), ttl)
    }

    fn key(s: &str) -> String {
        s.to_string()
    }

    #[tokio::test]
    async fn get_returns_what_put_stored() {
        let c = cache(10, Duration::from_secs(60));
        c.put(key("a"), 1).await;
        assert_eq!(c.get(&key("a")).await, Some(1));
    }

    #[tokio::test]
    async fn miss_on_absent_key() {
        let c = cache(10, Duration::from_secs(60));
        assert_eq!(c.get(&key("nope")).await, None);
        let stats = c.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn capacity_overflow_evicts_least_recently_used() {
        let c = cache(3, Duration::from_secs(60));
        c.put(key("a"), 1).await;
        c.put(key("b"), 2).await;
        c.put(key("c"), 3).await;
        // Touch "a" so "b" becomes least recently used.
        assert_eq!(c.get(&key("a")).await, Some(1));
        c.put(key("d"), 4).await;

        assert!(!c.contains(&key("b")).await);
        assert!(c.contains(&key("a")).await);
        assert!(c.contains(&key("c")).await);
        assert!(c.contains(&key("d")).await);
        assert_eq!(c.stats().await.evictions, 1);
        assert_eq!(c.len().await, 3);
    }

    #[tokio::test]
    async fn replacing_a_key_does_not_count_as_eviction() {
        let c = cache(2, Duration::from_secs(60));
        c.put(key("a"), 1).await;
        c.put(key("b"), 2).await;
        c.put(key("a"), 10).await;
        assert_eq!(c.get(&key("a")).await, Some(10));
        assert!(c.contains(&key("b")).await);
        assert_eq!(c.stats().await.evictions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let ttl = Duration::from_secs(60);
        let c = cache(10, ttl);
        c.put(key("a"), 1).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(c.get(&key("a")).await, Some(1));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(c.get(&key("a")).await, None);

        let stats = c.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn hits_do_not_extend_the_deadline() {
        let ttl = Duration::from_secs(60);
        let c = cache(10, ttl);
        c.put(key("a"), 1).await;

        // Keep the entry hot right up to its deadline.
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(11)).await;
            assert_eq!(c.get(&key("a")).await, Some(1));
        }

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(c.get(&key("a")).await, None, "recency must not reset TTL");
    }

    #[tokio::test(start_paused = true)]
    async fn put_resets_the_deadline_for_that_key() {
        let ttl = Duration::from_secs(60);
        let c = cache(10, ttl);
        c.put(key("a"), 1).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        c.put(key("a"), 2).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        assert_eq!(c.get(&key("a")).await, Some(2));
    }

    #[tokio::test]
    async fn invalidate_all_clears_entries_but_keeps_counters() {
        let c = cache(10, Duration::from_secs(60));
        c.put(key("a"), 1).await;
        c.put(key("b"), 2).await;
        assert_eq!(c.get(&key("a")).await, Some(1));
        assert_eq!(c.get(&key("zzz")).await, None);

        c.invalidate_all().await;

        assert!(c.is_empty().await);
        assert_eq!(c.get(&key("a")).await, None);
        let stats = c.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn purge_expired_sweeps_only_stale_entries() {
        let ttl = Duration::from_secs(60);
        let c = cache(10, ttl);
        c.put(key("old"), 1).await;
        tokio::time::advance(Duration::from_secs(40)).await;
        c.put(key("fresh"), 2).await;
        tokio::time::advance(Duration::from_secs(25)).await;

        let removed = c.purge_expired().await;
        assert_eq!(removed, 1);
        assert!(!c.contains(&key("old")).await);
        assert!(c.contains(&key("fresh")).await);
        assert_eq!(c.stats().await.expirations, 1);
    }

    #[tokio::test]
    async fn hit_rate_is_a_ratio() {
        let c = cache(10, Duration::from_secs(60));
        assert_eq!(c.stats().await.hit_rate, 0.0);

        c.put(key("a"), 1).await;
        for _ in 0..3 {
            c.get(&key("a")).await;
        }
        c.get(&key("missing")).await;

        let stats = c.stats().await;
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.75).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn concurrent_readers_and_writers_keep_accounting_consistent() {
        let c = Arc::new(cache(64, Duration::from_secs(60)));
        let mut handles = Vec::new();
        for worker in 0..8u32 {
            let c = Arc::clone(&c);
            handles.push(tokio::spawn(async move {
                for i in 0..50u32 {
                    let k = format!("k{}", (worker * 50 + i) % 96);
                    c.put(k.clone(), i).await;
                    c.get(&k).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = c.stats().await;
        assert_eq!(stats.hits + stats.misses, 8 * 50);
        assert!(stats.size <= stats.max_size);
    }
}
