//! # Cache Trait
//!
//! [`FrequencyCache`] is the operation set of a bounded, frequency-tracking
//! cache. Code that only needs those operations can be written against the
//! trait and stay independent of the concrete cache type.
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │         FrequencyCache<K, V>            │
//!   │                                         │
//!   │  get(&mut, &K) → Result<&V, KeyNotFound>│
//!   │  put(&mut, K, V)                        │
//!   │  frequency(&, &K) → Result<u64, _>      │
//!   │  len(&) → usize                         │
//!   │  capacity(&) → usize                    │
//!   │  is_empty(&) → bool     (provided)      │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! `get` takes `&mut self`: a hit changes the entry's frequency, which in turn
//! changes eviction order.
//!
//! ## Example
//!
//! ```
//! use lfukit::policy::lfu::LfuCache;
//! use lfukit::traits::FrequencyCache;
//!
//! fn warm<C: FrequencyCache<u32, &'static str>>(cache: &mut C) {
//!     cache.put(1, "one");
//!     let _ = cache.get(&1);
//! }
//!
//! let mut cache = LfuCache::new(8);
//! warm(&mut cache);
//! assert_eq!(cache.frequency(&1), Ok(2));
//! ```

use crate::error::KeyNotFound;

/// Bounded cache that counts accesses per key.
pub trait FrequencyCache<K, V> {
    /// Returns the value for `key` and counts the access.
    fn get(&mut self, key: &K) -> Result<&V, KeyNotFound>;

    /// Inserts or overwrites `key`. Overwriting counts as an access.
    fn put(&mut self, key: K, value: V);

    /// Returns the access count of `key` without changing it.
    fn frequency(&self, key: &K) -> Result<u64, KeyNotFound>;

    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
