use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::utils::{evict_front, move_key_to_end, remove_key};
use crate::{CacheConfig, CacheEntry, EvictionPolicy};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// A thread-safe cache of filter results keyed by a stringified criteria tuple.
///
/// The layout follows the classic map + order queue design: entries live in a
/// `RwLock<HashMap>` so concurrent hits only take a read lock, and insertion
/// order (or recency, for LRU) is tracked in a `Mutex<VecDeque>`.
///
/// # Eviction Behavior
///
/// When an insert pushes the cache over its limit:
///
/// - **FIFO**: the oldest inserted entry (front of the queue) is evicted
/// - **LRU**: the least recently read entry (front of the queue, reordered by `get()`) is evicted
/// - **Random**: a uniformly chosen entry is evicted
/// - **Clear**: every entry is dropped
///
/// # Lock Ordering
///
/// Writers always take the order mutex before the map write lock. `get()`
/// releases its read lock before touching the queue.
///
/// # Examples
///
/// ```
/// use userdir_core::{EvictionPolicy, FilterCache};
///
/// let cache = FilterCache::new(Some(2), EvictionPolicy::FIFO, None);
/// cache.insert("role=\"Admin\"", vec![1]);
/// cache.insert("role=\"User\"", vec![2, 3]);
/// cache.insert("status=\"Active\"", vec![1, 2]);
///
/// assert_eq!(cache.len(), 2);
/// assert_eq!(cache.get("role=\"Admin\""), None);
/// assert_eq!(cache.get("role=\"User\""), Some(vec![2, 3]));
/// ```
pub struct FilterCache<V> {
    map: RwLock<HashMap<String, CacheEntry<V>>>,
    order: Mutex<VecDeque<String>>,
    limit: Option<usize>,
    policy: EvictionPolicy,
    ttl: Option<u64>,
    #[cfg(feature = "stats")]
    stats: CacheStats,
}

impl<V: Clone> FilterCache<V> {
    /// Creates an empty cache.
    ///
    /// * `limit` - maximum number of entries (`None` for unbounded)
    /// * `policy` - eviction policy applied when `limit` is exceeded
    /// * `ttl` - optional time-to-live in seconds
    pub fn new(limit: Option<usize>, policy: EvictionPolicy, ttl: Option<u64>) -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
            order: Mutex::new(VecDeque::new()),
            limit,
            policy,
            ttl,
            #[cfg(feature = "stats")]
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache from the `cache` section of a directory configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.limit, config.policy, config.ttl)
    }

    /// Retrieves a cached value by key.
    ///
    /// Expired entries are removed and reported as misses. Under LRU a hit
    /// moves the key to the back of the order queue.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut result = None;
        let mut expired = false;

        {
            let m = self.map.read();
            if let Some(entry) = m.get(key) {
                if entry.is_expired(self.ttl) {
                    expired = true;
                } else {
                    result = Some(entry.value.clone());
                }
            }
        }

        if expired {
            let mut o = self.order.lock();
            let mut m = self.map.write();
            remove_key(&mut *m, &mut *o, key);
            #[cfg(feature = "stats")]
            self.stats.record_miss();
            return None;
        }

        #[cfg(feature = "stats")]
        {
            if result.is_some() {
                self.stats.record_hit();
            } else {
                self.stats.record_miss();
            }
        }

        if result.is_some() && self.policy == EvictionPolicy::LRU {
            move_key_to_end(&mut self.order.lock(), key);
        }

        result
    }

    /// Inserts or replaces a value, then enforces the entry limit.
    pub fn insert(&self, key: &str, value: V) {
        let key_s = key.to_string();
        let mut o = self.order.lock();
        let mut m = self.map.write();

        m.insert(key_s.clone(), CacheEntry::new(value));
        if let Some(pos) = o.iter().position(|k| *k == key_s) {
            o.remove(pos);
        }
        o.push_back(key_s);

        let evicted = self.enforce_limit(&mut *m, &mut *o);
        if evicted > 0 {
            tracing::trace!(evicted, policy = ?self.policy, "filter cache eviction");
            #[cfg(feature = "stats")]
            self.stats.record_evictions(evicted as u64);
        }
    }

    /// Evicts entries until the cache respects its limit. Returns how many were dropped.
    fn enforce_limit(
        &self,
        m: &mut HashMap<String, CacheEntry<V>>,
        o: &mut VecDeque<String>,
    ) -> usize {
        let Some(limit) = self.limit else {
            return 0;
        };

        let mut evicted = 0;
        while m.len() > limit {
            let removed = match self.policy {
                EvictionPolicy::Clear => {
                    evicted += m.len();
                    m.clear();
                    o.clear();
                    break;
                }
                EvictionPolicy::Random => {
                    if o.is_empty() {
                        false
                    } else {
                        let pos = fastrand::usize(..o.len());
                        o.remove(pos).map(|k| m.remove(&k).is_some()).unwrap_or(false)
                    }
                }
                EvictionPolicy::FIFO | EvictionPolicy::LRU => evict_front(m, o).is_some(),
            };

            if !removed {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    /// Removes a single entry. Returns `true` if it was cached.
    pub fn remove(&self, key: &str) -> bool {
        let mut o = self.order.lock();
        let mut m = self.map.write();
        remove_key(&mut *m, &mut *o, key)
    }

    /// Drops every entry. Statistics are kept.
    pub fn clear(&self) {
        let mut o = self.order.lock();
        let mut m = self.map.write();
        m.clear();
        o.clear();
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Keys in eviction order (front is evicted first under FIFO/LRU).
    pub fn keys(&self) -> Vec<String> {
        self.order.lock().iter().cloned().collect()
    }

    /// Hit/miss/eviction counters of this cache.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<V> fmt::Debug for FilterCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCache")
            .field("len", &self.map.read().len())
            .field("limit", &self.limit)
            .field("policy", &self.policy)
            .field("ttl", &self.ttl)
            .finish()
    }
}
