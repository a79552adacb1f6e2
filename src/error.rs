//! Error types for the lfukit library.
//!
//! ## Key Components
//!
//! - [`KeyNotFound`]: Returned by lookups ([`LfuCache::get`], [`LfuCache::frequency`])
//!   when the key is not cached. Recoverable; the cache is left untouched.
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (a negative capacity).
//! - [`InvariantError`]: Returned by `check_invariants` when the index and the
//!   frequency chain disagree.
//!
//! ## Example Usage
//!
//! ```
//! use lfukit::builder::LfuCacheBuilder;
//! use lfukit::error::{ConfigError, KeyNotFound};
//! use lfukit::policy::lfu::LfuCache;
//!
//! // Fallible constructor for user-supplied capacities
//! let bad = LfuCacheBuilder::new().capacity(-1).try_build::<u32, u32>();
//! assert_eq!(bad.unwrap_err(), ConfigError::InvalidCapacity { capacity: -1 });
//!
//! let mut cache: LfuCache<u32, u32> = LfuCache::new(2);
//! assert_eq!(cache.get(&7), Err(KeyNotFound));
//! ```
//!
//! [`LfuCache::get`]: crate::policy::lfu::LfuCache::get
//! [`LfuCache::frequency`]: crate::policy::lfu::LfuCache::frequency

use std::fmt;

// ---------------------------------------------------------------------------
// KeyNotFound
// ---------------------------------------------------------------------------

/// Error returned when a looked-up key is not present in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyNotFound;

impl fmt::Display for KeyNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not found")
    }
}

impl std::error::Error for KeyNotFound {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`LfuCacheBuilder::try_build`](crate::builder::LfuCacheBuilder::try_build).
/// [`LfuCacheBuilder::build`](crate::builder::LfuCacheBuilder::build) panics with
/// the same message instead, since a negative capacity is a programming error.
///
/// # Example
///
/// ```
/// use lfukit::builder::LfuCacheBuilder;
///
/// let err = LfuCacheBuilder::new().capacity(-3).try_build::<u64, u64>().unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// assert_eq!(err.capacity(), -3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested capacity was negative.
    InvalidCapacity { capacity: i64 },
}

impl ConfigError {
    /// Returns the rejected capacity value.
    #[inline]
    pub fn capacity(&self) -> i64 {
        match self {
            ConfigError::InvalidCapacity { capacity } => *capacity,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCapacity { capacity } => {
                write!(f, "invalid capacity {capacity}: capacity must be >= 0")
            },
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`FrequencyChain::check_invariants`](crate::ds::FrequencyChain::check_invariants)
/// and [`LfuCache::check_invariants`](crate::policy::lfu::LfuCache::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- KeyNotFound ------------------------------------------------------

    #[test]
    fn key_not_found_display() {
        assert_eq!(KeyNotFound.to_string(), "key not found");
    }

    #[test]
    fn key_not_found_is_copy_and_eq() {
        let a = KeyNotFound;
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn key_not_found_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<KeyNotFound>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_names_capacity() {
        let err = ConfigError::InvalidCapacity { capacity: -1 };
        assert_eq!(
            err.to_string(),
            "invalid capacity -1: capacity must be >= 0"
        );
    }

    #[test]
    fn config_capacity_accessor() {
        let err = ConfigError::InvalidCapacity { capacity: -42 };
        assert_eq!(err.capacity(), -42);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("bucket 3 is empty");
        assert_eq!(err.to_string(), "bucket 3 is empty");
    }

    #[test]
    fn invariant_message_accessor_and_clone() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.message(), "x");
    }
}
