pub mod frequency_chain;
pub mod slot_arena;

pub use frequency_chain::{FrequencyChain, Iter, DEFAULT_BUCKET_PREALLOC};
pub use slot_arena::{SlotArena, SlotId};
