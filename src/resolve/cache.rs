//! Resolution cache
//!
//! Memoizes label -> record-or-absent for the lifetime of the process with
//! bounded LRU eviction. A key being resolved lives in a separate in-flight
//! table as a shared `OnceCell`, so concurrent requests for it run one
//! computation and the rest wait for its result. Only finished entries enter
//! the LRU, so eviction can never drop a computation that is still running.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use serde::Serialize;
use tokio::sync::{Mutex, OnceCell};

use crate::models::ResolutionEntry;
use crate::nutrition::NormalizedKey;

type Slot = Arc<OnceCell<ResolutionEntry>>;

/// Cache counters, reported by the status tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Resolved entries held by the LRU
    pub entries: usize,
    /// Keys currently being resolved
    pub in_flight: usize,
    pub capacity: usize,
    /// Lookups answered from an already resolved entry
    pub hits: u64,
    /// Lookups that had to compute or wait for an in-flight computation
    pub misses: u64,
    /// Computations actually started
    pub computations: u64,
}

struct Slots {
    resolved: LruCache<NormalizedKey, ResolutionEntry>,
    in_flight: HashMap<NormalizedKey, Slot>,
}

enum Lookup {
    Resolved(ResolutionEntry),
    Pending(Slot),
}

/// Process-wide label cache with single-flight semantics per key
pub struct ResolutionCache {
    slots: Mutex<Slots>,
    capacity: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    computations: AtomicU64,
}

impl ResolutionCache {
    /// Capacity used when zero is requested
    pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: Mutex::new(Slots {
                resolved: LruCache::new(capacity),
                in_flight: HashMap::new(),
            }),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            computations: AtomicU64::new(0),
        }
    }

    /// Create a cache holding up to `capacity` keys (0 selects the default)
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(NonZeroUsize::new(capacity).unwrap_or(Self::DEFAULT_CAPACITY))
    }

    /// Return the entry for `key`, running `compute` only if no entry exists
    /// and no other caller is already computing it
    ///
    /// Both present and absent outcomes are memoized. The lock is only held
    /// to find or insert the key's slot, never across `compute`.
    pub async fn get_or_compute<F, Fut>(&self, key: &NormalizedKey, compute: F) -> ResolutionEntry
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ResolutionEntry>,
    {
        let slot = match self.lookup(key).await {
            Lookup::Resolved(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Cache hit for '{}'", key);
                return entry;
            }
            Lookup::Pending(slot) => slot,
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        let entry = slot
            .get_or_init(|| async {
                self.computations.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Cache miss for '{}', resolving", key);
                compute().await
            })
            .await
            .clone();

        self.promote(key, &slot).await;
        entry
    }

    /// Peek at a resolved entry without computing; `None` means unknown
    /// (never resolved, evicted, or still in flight)
    pub async fn get(&self, key: &NormalizedKey) -> Option<ResolutionEntry> {
        let slots = self.slots.lock().await;
        slots.resolved.peek(key).cloned()
    }

    /// Number of resolved entries
    pub async fn len(&self) -> usize {
        self.slots.lock().await.resolved.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        let (entries, in_flight) = {
            let slots = self.slots.lock().await;
            (slots.resolved.len(), slots.in_flight.len())
        };
        CacheStats {
            entries,
            in_flight,
            capacity: self.capacity.get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
        }
    }

    async fn lookup(&self, key: &NormalizedKey) -> Lookup {
        let mut slots = self.slots.lock().await;
        if let Some(entry) = slots.resolved.get(key) {
            return Lookup::Resolved(entry.clone());
        }
        let slot = slots
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()));
        Lookup::Pending(Arc::clone(slot))
    }

    /// Move a finished slot from the in-flight table into the LRU
    ///
    /// Every waiter calls this; only the first to find its own slot still
    /// registered performs the move.
    async fn promote(&self, key: &NormalizedKey, slot: &Slot) {
        let Some(entry) = slot.get() else {
            return;
        };
        let mut slots = self.slots.lock().await;
        let Slots {
            resolved,
            in_flight,
        } = &mut *slots;
        if in_flight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            in_flight.remove(key);
            resolved.put(key.clone(), entry.clone());
        }
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionRecord;
    use crate::nutrition::normalize;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn record(query: &str) -> NutritionRecord {
        NutritionRecord {
            query: query.to_string(),
            product_name: Some(query.to_string()),
            energy_kj: None,
            energy_kcal: Some(52.0),
            fat_g: None,
            carbs_g: None,
            sugars_g: None,
            protein_g: None,
            source: "OpenFoodFacts".to_string(),
        }
    }

    #[tokio::test]
    async fn test_computes_once_per_key() {
        let cache = ResolutionCache::default();
        let calls = AtomicUsize::new(0);
        let key = normalize("apple");

        for _ in 0..3 {
            let entry = cache
                .get_or_compute(&key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Some(record("apple"))
                })
                .await;
            assert_eq!(entry, Some(record("apple")));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.computations, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_absence_is_memoized() {
        let cache = ResolutionCache::default();
        let calls = AtomicUsize::new(0);
        let key = normalize("unobtainium");

        for _ in 0..2 {
            let entry = cache
                .get_or_compute(&key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    None
                })
                .await;
            assert_eq!(entry, None);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&key).await, Some(None));
    }

    #[tokio::test]
    async fn test_get_unknown_key() {
        let cache = ResolutionCache::default();
        assert_eq!(cache.get(&normalize("pear")).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_lru_eviction_recomputes() {
        let cache = ResolutionCache::with_capacity(2);
        let calls = AtomicUsize::new(0);
        let keys: Vec<_> = ["a", "b", "c"].iter().map(|k| normalize(k)).collect();

        for key in &keys {
            cache
                .get_or_compute(key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    None
                })
                .await;
        }
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(&keys[0]).await, None);

        // "a" was evicted, so it is computed again
        cache
            .get_or_compute(&keys[0], || async {
                calls.fetch_add(1, Ordering::SeqCst);
                None
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_zero_capacity_uses_default() {
        let cache = ResolutionCache::with_capacity(0);
        assert_eq!(cache.stats().await.capacity, 256);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lookups_share_one_computation() {
        let cache = Arc::new(ResolutionCache::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = normalize("banana");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute(&key, || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Some(record("banana"))
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Some(record("banana")));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().await.computations, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_inflight_key_survives_eviction_pressure() {
        let cache = Arc::new(ResolutionCache::with_capacity(1));
        let calls = Arc::new(AtomicUsize::new(0));
        let apple = normalize("apple");

        let slow = {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let apple = apple.clone();
            tokio::spawn(async move {
                cache
                    .get_or_compute(&apple, || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        Some(record("apple"))
                    })
                    .await
            })
        };

        // Let "apple" start, then fill the single LRU slot with another key
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.stats().await.in_flight, 1);
        cache
            .get_or_compute(&normalize("pear"), || async { None })
            .await;

        let again = cache
            .get_or_compute(&apple, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Some(record("apple"))
            })
            .await;

        assert_eq!(slow.await.unwrap(), Some(record("apple")));
        assert_eq!(again, Some(record("apple")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = cache.stats().await;
        assert_eq!(stats.in_flight, 0);
        assert_eq!(stats.entries, 1);
        assert_eq!(cache.get(&apple).await, Some(Some(record("apple"))));
    }
}
