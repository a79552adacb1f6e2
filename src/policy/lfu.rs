//! # LFU (Least Frequently Used) Cache
//!
//! Exact, deterministic LFU with an LRU tie-break: when the cache is full, the
//! entry with the lowest access count is evicted, and among equals the one
//! touched least recently goes first. Every read, write and frequency lookup is
//! O(1); a full enumeration is O(len).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCache<K, V>                                  │
//!   │                                                                          │
//!   │   index: FxHashMap<K, SlotId>          chain: FrequencyChain<K, V>       │
//!   │   ┌─────────┬────────┐                 (owns every entry)                │
//!   │   │ page_1  │ id_0   │──────┐                                            │
//!   │   │ page_2  │ id_1   │────┐ │    sentinel ⇄ [freq 1] ⇄ [freq 3] ⇄ ...    │
//!   │   │ page_3  │ id_2   │──┐ │ │                id_2 id_1    id_0           │
//!   │   └─────────┴────────┘  └─┴─┴──────────────►  (MRU → LRU per bucket)     │
//!   │                                                                          │
//!   │   capacity: usize  (fixed at construction)                               │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index maps a key to the handle of its entry; the chain owns the entry
//! and orders it. Every mutating operation updates both before returning.
//!
//! ## Operations
//!
//! | Method          | Complexity | Description                                  |
//! |-----------------|------------|----------------------------------------------|
//! | `get(&k)`       | O(1)       | Value on hit; frequency + 1                  |
//! | `put(k, v)`     | O(1)       | Insert or overwrite; overwrite counts as hit |
//! | `frequency(&k)` | O(1)       | Access count, no side effect                 |
//! | `len()`         | O(1)       | Current entry count                          |
//! | `capacity()`    | O(1)       | Fixed bound                                  |
//! | `iter()`        | O(n)       | Lazy, highest frequency first                |
//!
//! ## Eviction Flow
//!
//! ```text
//!   put(new_key, value)
//!        │
//!        ▼
//!   key cached? ── YES ──► overwrite value, promote (freq + 1), done
//!        │ NO
//!        ▼
//!   capacity == 0? ── YES ──► drop the pair, done
//!        │ NO
//!        ▼
//!   len == capacity? ── YES ──► pop tail of lowest-frequency bucket
//!        │
//!        ▼
//!   push new entry at freq 1 (front of the freq-1 bucket)
//! ```
//!
//! ## Thread Safety
//!
//! `LfuCache` is not internally synchronized, and `get` mutates. Share it
//! behind a single exclusive lock such as `Mutex<LfuCache<K, V>>`.
//!
//! ## Example Usage
//!
//! ```
//! use lfukit::policy::lfu::LfuCache;
//!
//! let mut cache = LfuCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//!
//! assert_eq!(cache.get(&"a"), Ok(&1)); // "a" now at frequency 2
//! cache.put("c", 3);                   // evicts "b"
//!
//! assert!(cache.get(&"b").is_err());
//! assert_eq!(cache.frequency(&"a"), Ok(2));
//!
//! let keys: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, vec!["a", "c"]);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::frequency_chain::{FrequencyChain, Iter};
use crate::ds::slot_arena::SlotId;
use crate::error::{InvariantError, KeyNotFound};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::FrequencyCache;

/// Capacity used when none is given.
pub const DEFAULT_CAPACITY: usize = 5;

/// Upper bound on storage reserved at construction. Larger caches grow on demand.
const MAX_PREALLOC: usize = 1 << 16;

/// Exact LFU cache with LRU tie-breaking.
///
/// See module-level documentation for details.
#[derive(Clone)]
pub struct LfuCache<K, V> {
    index: FxHashMap<K, SlotId>,
    chain: FrequencyChain<K, V>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 yields a cache that never retains anything.
    ///
    /// ```
    /// use lfukit::policy::lfu::LfuCache;
    ///
    /// let cache: LfuCache<u64, String> = LfuCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::with_prealloc(capacity, true)
    }

    pub(crate) fn with_prealloc(capacity: usize, prealloc: bool) -> Self {
        let reserve = if prealloc {
            capacity.min(MAX_PREALLOC)
        } else {
            0
        };
        debug!(capacity, reserve, "creating lfu cache");
        LfuCache {
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            chain: FrequencyChain::with_capacity(reserve),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    /// Returns the value for `key` and counts the access.
    ///
    /// On a hit the entry's frequency grows by one and it becomes the most
    /// recently touched entry at its new frequency. On a miss nothing changes.
    ///
    /// ```
    /// use lfukit::error::KeyNotFound;
    /// use lfukit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(3);
    /// cache.put("key".to_string(), 7);
    ///
    /// // Borrowed lookups: &str for String keys
    /// assert_eq!(cache.get("key"), Ok(&7));
    /// assert_eq!(cache.frequency("key"), Ok(2));
    /// assert_eq!(cache.get("missing"), Err(KeyNotFound));
    /// ```
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return Err(KeyNotFound);
        };

        self.chain.promote(id);

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.chain.value(id).ok_or(KeyNotFound)
    }

    /// Inserts `key`, or overwrites its value if already cached.
    ///
    /// Overwriting counts as an access (frequency + 1). Inserting a new key
    /// into a full cache first evicts the least frequently used entry, the
    /// least recently touched one among ties. New keys start at frequency 1.
    ///
    /// ```
    /// use lfukit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(2);
    /// cache.put(1, "one");
    /// cache.put(2, "two");
    /// cache.put(1, "uno");           // overwrite, freq(1) = 2
    /// cache.put(3, "three");         // evicts 2
    ///
    /// assert_eq!(cache.frequency(&1), Ok(2));
    /// assert!(!cache.contains(&2));
    /// assert_eq!(cache.peek(&1), Some(&"uno"));
    /// ```
    pub fn put(&mut self, key: K, value: V) {
        #[cfg(feature = "metrics")]
        self.metrics.record_put_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_put_update();

            if let Some(slot) = self.chain.value_mut(id) {
                *slot = value;
            }
            self.chain.promote(id);
            return;
        }

        if self.capacity == 0 {
            #[cfg(feature = "metrics")]
            self.metrics.record_put_rejected();
            trace!("zero-capacity cache dropped put");
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_put_new();

        if self.chain.len() >= self.capacity {
            self.evict_one();
        }

        let id = self.chain.push_new(key.clone(), value);
        self.index.insert(key, id);
    }

    /// Returns the access count of `key` without counting an access.
    #[inline]
    pub fn frequency<Q>(&self, key: &Q) -> Result<u64, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_frequency_call();

        let id = *self.index.get(key).ok_or(KeyNotFound)?;
        let frequency = self.chain.frequency(id).ok_or(KeyNotFound)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_frequency_found();

        Ok(frequency)
    }

    /// Returns the value for `key` without counting an access.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let value = self.chain.value(*self.index.get(key)?)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_found();

        Some(value)
    }

    /// Returns the entry the next eviction would remove.
    ///
    /// ```
    /// use lfukit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(3);
    /// cache.put('a', 1);
    /// cache.put('b', 2);
    /// let _ = cache.get(&'a');
    ///
    /// assert_eq!(cache.peek_lfu(), Some((&'b', &2)));
    /// assert_eq!(cache.len(), 2); // not removed
    /// ```
    pub fn peek_lfu(&self) -> Option<(&K, &V)> {
        self.chain.peek_lfu().map(|(key, value, _)| (key, value))
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Verifies that the index and the frequency chain agree.
    ///
    /// Intended for tests and fuzzing; a well-formed cache always returns `Ok`.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.chain.check_invariants()?;

        if self.chain.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.chain.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.chain.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys, chain holds {} entries",
                self.index.len(),
                self.chain.len()
            )));
        }
        for (key, &id) in &self.index {
            if self.chain.key(id) != Some(key) {
                return Err(InvariantError::new(format!(
                    "index handle {id:?} resolves to a different entry"
                )));
            }
        }
        Ok(())
    }

    fn evict_one(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let Some((key, _value, frequency)) = self.chain.pop_lfu() else {
            return;
        };
        self.index.remove(&key);

        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();

        trace!(frequency, len = self.chain.len(), "evicted least frequently used entry");
    }
}

impl<K, V> LfuCache<K, V> {
    /// Current number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Maximum number of entries, fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lazily iterates `(key, value)` pairs from the highest frequency down.
    ///
    /// Within one frequency, the most recently touched entry comes first.
    /// Iteration does not count as an access. The iterator borrows the cache,
    /// so the cache cannot change while it is in use; stopping early (e.g. with
    /// `take` or `find`) stops the walk.
    ///
    /// ```
    /// use lfukit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(4);
    /// for k in 1..=5 {
    ///     cache.put(k, k * 10); // 5th put evicts key 1
    /// }
    ///
    /// let head: Vec<_> = cache
    ///     .iter()
    ///     .take_while(|(k, _)| **k != 2)
    ///     .map(|(k, v)| (*k, *v))
    ///     .collect();
    /// assert_eq!(head, vec![(5, 50), (4, 40), (3, 30)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_iter_call();

        self.chain.iter()
    }
}

impl<K, V> Default for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<'a, K, V> IntoIterator for &'a LfuCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, V)> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("capacity", &self.capacity)
            .field("len", &self.chain.len())
            .field("entries", &self.chain.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<K, V> FrequencyCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn get(&mut self, key: &K) -> Result<&V, KeyNotFound> {
        LfuCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) {
        LfuCache::put(self, key, value)
    }

    fn frequency(&self, key: &K) -> Result<u64, KeyNotFound> {
        LfuCache::frequency(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V> {
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            put_calls: self.metrics.put_calls,
            put_new: self.metrics.put_new,
            put_updates: self.metrics.put_updates,
            put_rejected: self.metrics.put_rejected,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            frequency_calls: self.metrics.frequency_calls.get(),
            frequency_found: self.metrics.frequency_found.get(),
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            iter_calls: self.metrics.iter_calls.get(),
            cache_len: self.chain.len(),
            capacity: self.capacity,
            bucket_count: self.chain.bucket_count(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache<K, V> {
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}
