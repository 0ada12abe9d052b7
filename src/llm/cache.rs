// ============================================
// PETDIAG - Memoized Provider Replies
// ============================================

use lru::LruCache;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Default number of distinct keys kept resident.
pub const DEFAULT_CAPACITY: usize = 128;

struct Inner<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    hits: u64,
    misses: u64,
}

/// Fixed-capacity LRU cache for provider results.
///
/// Keys are compared by exact equality. The lock is only held for the map
/// operation itself, never across the fetch in [`ResponseCache::get_or_try_insert_with`],
/// so two concurrent misses on the same key may both fetch; the later insert wins.
pub struct ResponseCache<K: Hash + Eq, V> {
    inner: Mutex<Inner<K, V>>,
    capacity: NonZeroUsize,
}

impl<K: Hash + Eq, V: Clone> Default for ResponseCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K: Hash + Eq, V: Clone> ResponseCache<K, V> {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
            capacity,
        }
    }

    /// Get a resident value, marking it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().ok()?;
        match inner.entries.get(key).cloned() {
            Some(value) => {
                inner.hits += 1;
                Some(value)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store a value, evicting the least recently used key at capacity
    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut inner) = self.inner.lock() {
            let evicts = inner.entries.len() == self.capacity.get() && !inner.entries.contains(&key);
            inner.entries.put(key, value);
            if evicts {
                tracing::debug!("Cache at capacity {}, evicted oldest entry", self.capacity);
            }
        }
    }

    /// Return the cached value for `key`, or run `fetch` and remember a
    /// successful result. Errors are passed through and not cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(&key) {
            tracing::debug!("Cache hit");
            return Ok(hit);
        }

        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all cache entries
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.entries.clear();
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        match self.inner.lock() {
            Ok(inner) => CacheStats {
                total_entries: inner.entries.len(),
                max_entries: self.capacity.get(),
                hits: inner.hits,
                misses: inner.misses,
            },
            Err(_) => CacheStats {
                max_entries: self.capacity.get(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_set_get() {
        let cache: ResponseCache<String, String> = ResponseCache::new(10);

        cache.insert("otitis".to_string(), "ear".to_string());

        assert_eq!(cache.get(&"otitis".to_string()), Some("ear".to_string()));
    }

    #[test]
    fn test_cache_miss() {
        let cache: ResponseCache<String, String> = ResponseCache::new(10);

        assert_eq!(cache.get(&"nothing".to_string()), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_lru_eviction_order() {
        let cache: ResponseCache<u32, u32> = ResponseCache::new(2);

        cache.insert(1, 10);
        cache.insert(2, 20);
        // Touch 1 so that 2 becomes the eviction candidate.
        assert_eq!(cache.get(&1), Some(10));
        cache.insert(3, 30);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(30));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let cache: ResponseCache<u32, u32> = ResponseCache::new(0);
        cache.insert(1, 1);
        cache.insert(2, 2);

        assert_eq!(cache.stats().max_entries, 1);
        assert_eq!(cache.get(&2), Some(2));
        assert_eq!(cache.get(&1), None);
    }

    #[tokio::test]
    async fn test_memoized_fetch_runs_once() {
        let cache: ResponseCache<String, u32> = ResponseCache::default();
        let mut calls = 0;

        let first = cache
            .get_or_try_insert_with("k".to_string(), || {
                calls += 1;
                async { Ok::<_, String>(7) }
            })
            .await;
        let second = cache
            .get_or_try_insert_with("k".to_string(), || {
                calls += 1;
                async { Ok::<_, String>(8) }
            })
            .await;

        assert_eq!(first, Ok(7));
        assert_eq!(second, Ok(7));
        assert_eq!(calls, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let cache: ResponseCache<String, u32> = ResponseCache::default();

        let failed = cache
            .get_or_try_insert_with("k".to_string(), || async { Err::<u32, _>("boom") })
            .await;
        assert!(failed.is_err());
        assert!(cache.is_empty());

        let ok = cache
            .get_or_try_insert_with("k".to_string(), || async { Ok::<_, &str>(3) })
            .await;
        assert_eq!(ok, Ok(3));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lookups_stay_bounded() {
        use std::sync::Arc;

        const CAPACITY: usize = 8;
        const DISTINCT: u32 = 20;
        const ROUNDS: u32 = 5;

        let cache: Arc<ResponseCache<u32, u32>> = Arc::new(ResponseCache::new(CAPACITY));

        let mut tasks = Vec::new();
        for round in 0..ROUNDS {
            for key in 0..DISTINCT {
                // Every round also hammers key 0 so identical keys race.
                let key = if round % 2 == 0 { key } else { 0 };
                let cache = cache.clone();
                tasks.push(tokio::spawn(async move {
                    let value = cache
                        .get_or_try_insert_with(key, || async move {
                            tokio::task::yield_now().await;
                            Ok::<_, String>(key * 10)
                        })
                        .await
                        .unwrap();
                    (key, value)
                }));
            }
        }

        let total = tasks.len() as u64;
        for task in tasks {
            let (key, value) = task.await.unwrap();
            assert_eq!(value, key * 10);
        }

        let stats = cache.stats();
        assert!(cache.len() <= CAPACITY);
        assert_eq!(stats.total_entries, cache.len());
        assert_eq!(stats.hits + stats.misses, total);
    }

    #[test]
    fn test_clear() {
        let cache: ResponseCache<u32, u32> = ResponseCache::new(4);
        cache.insert(1, 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
