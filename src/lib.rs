//! lfukit: an exact O(1) least-frequently-used cache.
//!
//! Eviction removes the entry with the lowest access count; ties go to the
//! entry touched least recently. `get`, `put` and `frequency` run in constant
//! time, and the cache can be enumerated from the most to the least frequently
//! used entry.
//!
//! See `DESIGN.md` for internal architecture and invariants.
//!
//! ```
//! use lfukit::prelude::*;
//!
//! let mut cache = LfuCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! let _ = cache.get(&"a");
//! cache.put("c", 3);
//!
//! assert_eq!(cache.get(&"b"), Err(KeyNotFound));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use crate::builder::LfuCacheBuilder;
pub use crate::error::{ConfigError, InvariantError, KeyNotFound};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LfuMetricsSnapshot;
pub use crate::policy::lfu::{LfuCache, DEFAULT_CAPACITY};
pub use crate::traits::FrequencyCache;
