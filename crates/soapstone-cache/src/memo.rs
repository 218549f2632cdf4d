//! Single-flight LRU memoization.
//!
//! Entries live in one `Mutex<LruCache>`; in-progress computations live
//! in a separate flight table keyed by fingerprint. The closure passed
//! to [`MemoCache::get_or_compute`] always runs outside both locks, so
//! computations for different fingerprints proceed in parallel and the
//! store stays responsive while a slow note is being classified.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use ahash::AHashMap;
use lru::LruCache;
use tracing::debug;

use soapstone_core::{ConfigError, Fingerprint};

/// How a `get_or_compute` call obtained its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Found in the store.
    Hit,
    /// This call ran the computation.
    Computed,
    /// Another in-flight call computed it; this call waited.
    Joined,
}

/// Counter snapshot. `hits + misses` is the total number of lookups;
/// misses resolve by computing, by joining an existing flight, or by a
/// late hit when the flight finished during the race.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub computations: u64,
    pub joined: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// One in-progress computation. Joiners park on the condvar until the
/// leader publishes the result.
#[derive(Debug)]
struct Flight<V> {
    result: Mutex<Option<V>>,
    done: Condvar,
}

impl<V> Flight<V> {
    fn new() -> Self {
        Self {
            result: Mutex::new(None),
            done: Condvar::new(),
        }
    }
}

/// Bounded single-flight memoization keyed by note fingerprint.
///
/// Eviction is strict LRU: the entry whose last access is oldest goes
/// first, ties broken by insertion order. Entries are only ever
/// invalidated by capacity, never by age.
#[derive(Debug)]
pub struct MemoCache<V: Clone> {
    store: Mutex<LruCache<Fingerprint, V>>,
    flights: Mutex<AHashMap<Fingerprint, Arc<Flight<V>>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    computations: AtomicU64,
    joined: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> MemoCache<V> {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        let cap = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCacheCapacity)?;
        Ok(Self {
            store: Mutex::new(LruCache::new(cap)),
            flights: Mutex::new(AHashMap::new()),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            computations: AtomicU64::new(0),
            joined: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    /// Return the cached value for `key`, or run `compute` exactly once
    /// across all concurrent callers with the same key and cache its
    /// result. Every caller receives a clone of the same value.
    pub fn get_or_compute<F>(&self, key: &Fingerprint, compute: F) -> (V, CacheOutcome)
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.store.lock().unwrap().get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return (value.clone(), CacheOutcome::Hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let (flight, is_leader) = {
            let mut flights = self.flights.lock().unwrap();
            match flights.get(key) {
                Some(existing) => (Arc::clone(existing), false),
                None => {
                    let flight = Arc::new(Flight::new());
                    flights.insert(key.clone(), Arc::clone(&flight));
                    (flight, true)
                }
            }
        };

        if is_leader {
            // The previous flight may have landed between our store miss
            // and taking leadership; re-check before doing the work.
            let already = self.store.lock().unwrap().get(key).cloned();
            let (value, outcome) = match already {
                Some(value) => (value, CacheOutcome::Hit),
                None => {
                    let value = compute();
                    self.computations.fetch_add(1, Ordering::Relaxed);
                    self.insert(key, value.clone());
                    (value, CacheOutcome::Computed)
                }
            };

            *flight.result.lock().unwrap() = Some(value.clone());
            flight.done.notify_all();
            self.flights.lock().unwrap().remove(key);
            (value, outcome)
        } else {
            let value = {
                let mut slot = flight.result.lock().unwrap();
                loop {
                    if let Some(value) = slot.as_ref() {
                        break value.clone();
                    }
                    slot = flight.done.wait(slot).unwrap();
                }
            };
            self.joined.fetch_add(1, Ordering::Relaxed);
            (value, CacheOutcome::Joined)
        }
    }

    /// Value for `key` if present, promoting its recency. No flight is
    /// started on a miss.
    pub fn get(&self, key: &Fingerprint) -> Option<V> {
        let value = self.store.lock().unwrap().get(key).cloned();
        match &value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.store.lock().unwrap().contains(key)
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().unwrap().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry. Counters are not reset.
    pub fn clear(&self) {
        self.store.lock().unwrap().clear();
        debug!("cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            joined: self.joined.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity,
        }
    }

    fn insert(&self, key: &Fingerprint, value: V) {
        let mut store = self.store.lock().unwrap();
        if let Some((evicted_key, _)) = store.push(key.clone(), value) {
            // push also returns the old pair when the key itself is
            // replaced; only count true capacity evictions.
            if evicted_key != *key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!("cache evicted fingerprint {}", evicted_key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    fn fp(text: &str) -> Fingerprint {
        Fingerprint::of_text(text)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = MemoCache::<String>::new(0).expect_err("capacity 0 must fail");
        assert!(matches!(err, ConfigError::ZeroCacheCapacity));
    }

    #[test]
    fn test_second_call_is_a_hit() {
        let cache = MemoCache::new(4).expect("cache");
        let key = fp("patient reports headache");

        let (first, outcome) = cache.get_or_compute(&key, || "result".to_string());
        assert_eq!(outcome, CacheOutcome::Computed);

        let (second, outcome) = cache.get_or_compute(&key, || "should not run".to_string());
        assert_eq!(outcome, CacheOutcome::Hit);
        assert_eq!(first, second);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.computations, 1);
    }

    #[test]
    fn test_eviction_is_strict_lru() {
        let cache = MemoCache::new(2).expect("cache");
        let (a, b, c) = (fp("note a"), fp("note b"), fp("note c"));

        cache.get_or_compute(&a, || 1);
        cache.get_or_compute(&b, || 2);
        // Touch a so b becomes the least recently used.
        cache.get_or_compute(&a, || 10);
        cache.get_or_compute(&c, || 3);

        assert!(cache.contains(&a));
        assert!(!cache.contains(&b));
        assert!(cache.contains(&c));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_capacity_plus_one_evicts_exactly_the_oldest() {
        let capacity = 3;
        let cache = MemoCache::new(capacity).expect("cache");
        let keys: Vec<Fingerprint> = (0..=capacity).map(|i| fp(&format!("note {i}"))).collect();

        for (i, key) in keys.iter().enumerate() {
            cache.get_or_compute(key, || i);
        }

        assert_eq!(cache.len(), capacity);
        assert!(!cache.contains(&keys[0]), "oldest entry must be evicted");
        for key in &keys[1..] {
            assert!(cache.contains(key));
        }
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_single_flight_collapses_concurrent_calls() {
        let cache = Arc::new(MemoCache::new(4).expect("cache"));
        let key = fp("same note everywhere");
        let calls = Arc::new(AtomicUsize::new(0));
        let n = 8;
        let barrier = Arc::new(Barrier::new(n));

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let key = key.clone();
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let (value, _) = cache.get_or_compute(&key, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(50));
                        "classified".to_string()
                    });
                    value
                })
            })
            .collect();

        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one computation");
        assert!(results.iter().all(|r| r == "classified"));

        let stats = cache.stats();
        assert_eq!(stats.computations, 1);
        assert_eq!(stats.hits + stats.misses, n as u64);
    }

    #[test]
    fn test_waiting_call_joins_the_flight() {
        let cache = Arc::new(MemoCache::new(4).expect("cache"));
        let key = fp("joined note");
        let rendezvous = Arc::new(Barrier::new(2));

        let leader = {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            let rendezvous = Arc::clone(&rendezvous);
            thread::spawn(move || {
                cache.get_or_compute(&key, || {
                    rendezvous.wait();
                    // Give the other caller time to park on the flight.
                    thread::sleep(Duration::from_millis(100));
                    7
                })
            })
        };

        rendezvous.wait();
        let (value, outcome) =
            cache.get_or_compute(&key, || panic!("second caller must not compute"));
        assert_eq!(value, 7);
        assert_eq!(outcome, CacheOutcome::Joined);

        let (leader_value, leader_outcome) = leader.join().unwrap();
        assert_eq!(leader_value, 7);
        assert_eq!(leader_outcome, CacheOutcome::Computed);
        assert_eq!(cache.stats().joined, 1);
    }

    #[test]
    fn test_distinct_keys_compute_independently() {
        let cache = Arc::new(MemoCache::new(4).expect("cache"));
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = ["note one", "note two"]
            .into_iter()
            .map(|text| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let key = fp(text);
                    cache.get_or_compute(&key, || text.to_uppercase()).0
                })
            })
            .collect();

        let mut results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        results.sort();
        assert_eq!(results, vec!["NOTE ONE", "NOTE TWO"]);
        assert_eq!(cache.stats().computations, 2);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let cache = MemoCache::new(2).expect("cache");
        cache.get_or_compute(&fp("a"), || 1);
        cache.get_or_compute(&fp("b"), || 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 2);
        // Still usable after clear.
        let (_, outcome) = cache.get_or_compute(&fp("a"), || 3);
        assert_eq!(outcome, CacheOutcome::Computed);
    }
}
