//! Memoization caches.
//!
//! Two eviction strategies share the [`Cache`] trait: [`UnboundedCache`] keeps
//! every entry for its whole lifetime, [`LruCache`] holds at most `capacity`
//! entries and drops the least recently used one on overflow.

use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Hit/miss counters kept by every cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Common interface of the memoization caches
pub trait Cache<K, V> {
    /// Looks up `key`, counting a hit or a miss. LRU caches also mark the entry as recently used.
    fn get(&mut self, key: &K) -> Option<V>;

    /// Stores `value` under `key`, evicting if the policy demands it.
    fn insert(&mut self, key: K, value: V);

    /// Checks presence without touching metrics or recency.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    /// `None` for unbounded caches.
    fn capacity(&self) -> Option<usize>;

    fn metrics(&self) -> CacheMetrics;
}

/// Eviction strategy for a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never evict
    Unbounded,
    /// Evict the least recently used entry once the capacity is exceeded
    Lru(usize),
}

impl CachePolicy {
    pub fn from_capacity(capacity: Option<usize>) -> Self {
        match capacity {
            Some(cap) => CachePolicy::Lru(cap),
            None => CachePolicy::Unbounded,
        }
    }

    pub fn build<K, V>(self) -> Box<dyn Cache<K, V>>
    where
        K: Eq + Hash + Clone + 'static,
        V: Clone + 'static,
    {
        match self {
            CachePolicy::Unbounded => Box::new(UnboundedCache::new()),
            CachePolicy::Lru(cap) => Box::new(LruCache::new(cap)),
        }
    }
}

/// Plain map that grows for the lifetime of its owner
#[derive(Debug, Clone)]
pub struct UnboundedCache<K, V> {
    data: HashMap<K, V>,
    metrics: CacheMetrics,
}

impl<K, V> UnboundedCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            metrics: CacheMetrics::default(),
        }
    }
}

impl<K, V> Default for UnboundedCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for UnboundedCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn get(&mut self, key: &K) -> Option<V> {
        match self.data.get(key) {
            Some(value) => {
                self.metrics.hits += 1;
                Some(value.clone())
            }
            None => {
                self.metrics.misses += 1;
                None
            }
        }
    }

    fn insert(&mut self, key: K, value: V) {
        self.data.insert(key, value);
        self.metrics.inserts += 1;
    }

    fn contains(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn metrics(&self) -> CacheMetrics {
        self.metrics
    }
}

const PREALLOC_LIMIT: usize = 1024;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded cache with least-recently-used eviction.
///
/// Entries live in a slab (`nodes`) threaded by a doubly linked list ordered
/// from most recently used (`head`) to least recently used (`tail`), with
/// `index` mapping keys to slots. Hits, inserts and evictions are O(1).
/// Once the slab is full, an eviction reuses the slot of the tail entry.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    metrics: CacheMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// A capacity of zero is raised to one. Storage grows on demand up to `capacity`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let prealloc = capacity.min(PREALLOC_LIMIT);
        Self {
            capacity,
            index: HashMap::with_capacity(prealloc),
            nodes: Vec::with_capacity(prealloc),
            head: None,
            tail: None,
            metrics: CacheMetrics::default(),
        }
    }

    /// Keys from most to least recently used
    #[cfg(test)]
    fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            keys.push(self.nodes[idx].key.clone());
            cursor = self.nodes[idx].next;
        }
        keys
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        if let Some(h) = self.head {
            self.nodes[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn touch(&mut self, idx: usize) {
        if self.head != Some(idx) {
            self.unlink(idx);
            self.push_front(idx);
        }
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&mut self, key: &K) -> Option<V> {
        match self.index.get(key).copied() {
            Some(idx) => {
                self.touch(idx);
                self.metrics.hits += 1;
                Some(self.nodes[idx].value.clone())
            }
            None => {
                self.metrics.misses += 1;
                None
            }
        }
    }

    fn insert(&mut self, key: K, value: V) {
        self.metrics.inserts += 1;

        if let Some(idx) = self.index.get(&key).copied() {
            self.nodes[idx].value = value;
            self.touch(idx);
            return;
        }

        let idx = if self.nodes.len() < self.capacity {
            self.nodes.push(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.nodes.len() - 1
        } else {
            // full slab always has a tail
            let Some(lru) = self.tail else {
                return;
            };
            self.unlink(lru);
            self.index.remove(&self.nodes[lru].key);
            self.nodes[lru].key = key.clone();
            self.nodes[lru].value = value;
            self.metrics.evictions += 1;
            debug!(
                capacity = self.capacity,
                evictions = self.metrics.evictions,
                "lru cache evicted least recently used entry"
            );
            lru
        };

        self.index.insert(key, idx);
        self.push_front(idx);
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn metrics(&self) -> CacheMetrics {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_basic_operations() {
        let mut cache: UnboundedCache<String, f64> = UnboundedCache::new();
        assert_eq!(cache.get(&"GOOG".to_string()), None);

        cache.insert("GOOG".to_string(), 123.45);
        assert_eq!(cache.get(&"GOOG".to_string()), Some(123.45));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), None);

        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.inserts, 1);
        assert_eq!(metrics.evictions, 0);
        assert!((metrics.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut cache = UnboundedCache::new();
        for i in 0..10_000u32 {
            cache.insert(i, i);
        }
        assert_eq!(cache.len(), 10_000);
        assert!(cache.contains(&0));
        assert_eq!(cache.metrics().evictions, 0);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = LruCache::new(2);
        cache.insert("key1", 1);
        cache.insert("key2", 2);
        cache.insert("key3", 3); // evicts key1

        assert_eq!(cache.get(&"key1"), None);
        assert_eq!(cache.get(&"key2"), Some(2));
        assert_eq!(cache.get(&"key3"), Some(3));
        assert_eq!(cache.metrics().evictions, 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_get_refreshes_recency() {
        let mut cache = LruCache::new(3);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");
        assert_eq!(cache.keys(), vec![3, 2, 1]);

        assert_eq!(cache.get(&1), Some("a"));
        assert_eq!(cache.keys(), vec![1, 3, 2]);

        cache.insert(4, "d"); // evicts 2
        assert!(!cache.contains(&2));
        assert_eq!(cache.keys(), vec![4, 1, 3]);
    }

    #[test]
    fn test_lru_reinsert_updates_without_evicting() {
        let mut cache = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.metrics().evictions, 0);
        assert_eq!(cache.keys(), vec!["a", "b"]);
        assert_eq!(cache.get(&"a"), Some(10));
    }

    #[test]
    fn test_lru_contains_does_not_touch() {
        let mut cache = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert!(cache.contains(&"a"));
        cache.insert("c", 3);
        assert!(!cache.contains(&"a"));
        assert_eq!(cache.metrics().hits, 0);
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut cache = LruCache::new(0);
        assert_eq!(cache.capacity(), Some(1));
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.keys(), vec!["b"]);
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut cache = LruCache::new(usize::MAX);
        assert_eq!(cache.capacity(), Some(usize::MAX));
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));
    }

    #[test]
    fn test_policy_builds_matching_cache() {
        let mut unbounded: Box<dyn Cache<u32, u32>> = CachePolicy::from_capacity(None).build();
        let mut bounded: Box<dyn Cache<u32, u32>> = CachePolicy::from_capacity(Some(1)).build();
        for i in 0..3 {
            unbounded.insert(i, i);
            bounded.insert(i, i);
        }
        assert_eq!(unbounded.len(), 3);
        assert_eq!(unbounded.capacity(), None);
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded.capacity(), Some(1));
        assert_eq!(bounded.get(&2), Some(2));
    }
}
