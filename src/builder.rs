//! Checked construction for [`LfuCache`].
//!
//! [`LfuCache::new`] takes a `usize`, so a negative capacity cannot reach it.
//! Capacities that arrive as signed integers (config files, CLI flags, FFI)
//! go through [`LfuCacheBuilder`] instead, which rejects negative values.
//!
//! ## Example
//!
//! ```rust
//! use lfukit::builder::LfuCacheBuilder;
//!
//! let mut cache = LfuCacheBuilder::new().capacity(100).build::<u64, String>();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Ok(&"hello".to_string()));
//!
//! // Omitting capacity uses the default of 5
//! let small = LfuCacheBuilder::new().build::<u64, u64>();
//! assert_eq!(small.capacity(), 5);
//! ```

use std::hash::Hash;

use tracing::debug;

use crate::error::ConfigError;
use crate::policy::lfu::{LfuCache, DEFAULT_CAPACITY};

/// Builder for [`LfuCache`] instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuCacheBuilder {
    capacity: i64,
    prealloc: bool,
}

impl LfuCacheBuilder {
    /// Starts from the default capacity with preallocation enabled.
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY as i64,
            prealloc: true,
        }
    }

    /// Sets the maximum number of entries. Negative values are rejected at build time.
    pub fn capacity(mut self, capacity: i64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether to reserve index and entry storage for `capacity` entries up front.
    ///
    /// Disable for large, sparsely filled caches.
    pub fn prealloc(mut self, prealloc: bool) -> Self {
        self.prealloc = prealloc;
        self
    }

    /// Builds the cache, or returns [`ConfigError::InvalidCapacity`] for a negative capacity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfukit::builder::LfuCacheBuilder;
    /// use lfukit::error::ConfigError;
    ///
    /// let ok = LfuCacheBuilder::new().capacity(0).try_build::<u8, u8>();
    /// assert_eq!(ok.map(|c| c.capacity()), Ok(0));
    ///
    /// let err = LfuCacheBuilder::new().capacity(-1).try_build::<u8, u8>();
    /// assert!(matches!(err, Err(ConfigError::InvalidCapacity { capacity: -1 })));
    /// ```
    pub fn try_build<K, V>(self) -> Result<LfuCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        if self.capacity < 0 {
            debug!(capacity = self.capacity, "rejected negative cache capacity");
            return Err(ConfigError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        let capacity = usize::try_from(self.capacity).unwrap_or(usize::MAX);
        Ok(LfuCache::with_prealloc(capacity, self.prealloc))
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is negative.
    ///
    /// ```rust,should_panic
    /// use lfukit::builder::LfuCacheBuilder;
    ///
    /// let _ = LfuCacheBuilder::new().capacity(-1).build::<u8, u8>();
    /// ```
    pub fn build<K, V>(self) -> LfuCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Default for LfuCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
