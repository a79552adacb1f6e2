pub use crate::builder::LfuCacheBuilder;
pub use crate::error::{ConfigError, KeyNotFound};
pub use crate::policy::lfu::{LfuCache, DEFAULT_CAPACITY};
pub use crate::traits::FrequencyCache;
