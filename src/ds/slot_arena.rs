//! Slot arena with stable handles.
//!
//! Backing storage for the linked structures in [`FrequencyChain`](super::FrequencyChain).
//! Nodes refer to each other through [`SlotId`] handles instead of pointers, so
//! a stale link can at worst resolve to `None`; it can never dangle.
//!
//! ```text
//!   slots:     [ Some(a) | None | Some(c) | Some(d) ]
//!                  0        1       2         3
//!   free_list: [ 1 ]      ← next insert reuses slot 1
//! ```
//!
//! | Operation | Time |
//! |-----------|------|
//! | `insert`  | O(1) amortized |
//! | `remove`  | O(1) |
//! | `get`     | O(1) |

/// Stable handle to a value stored in a [`SlotArena`].
///
/// A handle stays valid until its value is removed. After removal the slot may
/// be reused by a later insert, so callers must drop handles they remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Returns the raw slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Vector-backed arena that reuses freed slots.
#[derive(Debug, Clone)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Creates an arena with room for `capacity` live values before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` and returns its handle, reusing a freed slot when one exists.
    #[inline]
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Takes the value out of `id`'s slot. Returns `None` for a vacant or unknown handle.
    #[inline]
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots, live or vacant.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Iterates live values in slot order (not in any list order).
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_reuses_slot() {
        let mut arena = SlotArena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(a));

        let c = arena.insert("c");
        assert_eq!(c.index(), a.index());
        assert_eq!(arena.slot_count(), 2);
        assert_eq!(arena.get(c), Some(&"c"));
    }

    #[test]
    fn remove_vacant_or_unknown_is_none() {
        let mut arena: SlotArena<u32> = SlotArena::with_capacity(4);
        let id = arena.insert(1);
        assert_eq!(arena.remove(id), Some(1));
        assert_eq!(arena.remove(id), None);
        assert_eq!(arena.remove(SlotId(99)), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = SlotArena::new();
        let id = arena.insert(10);
        if let Some(v) = arena.get_mut(id) {
            *v += 5;
        }
        assert_eq!(arena.get(id), Some(&15));
    }

    #[test]
    fn iter_skips_vacant_slots() {
        let mut arena = SlotArena::new();
        let a = arena.insert('a');
        let _b = arena.insert('b');
        let _c = arena.insert('c');
        arena.remove(a);
        let live: Vec<char> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(live, vec!['b', 'c']);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: len always equals the number of handles still held
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_len_matches_live_handles(
            ops in prop::collection::vec((any::<bool>(), any::<u16>()), 0..200)
        ) {
            let mut arena = SlotArena::new();
            let mut live: Vec<(SlotId, u16)> = Vec::new();

            for (insert, value) in ops {
                if insert || live.is_empty() {
                    let id = arena.insert(value);
                    live.push((id, value));
                } else {
                    let pick = value as usize % live.len();
                    let (id, expected) = live.swap_remove(pick);
                    prop_assert_eq!(arena.remove(id), Some(expected));
                }
                prop_assert_eq!(arena.len(), live.len());
                for (id, value) in &live {
                    prop_assert_eq!(arena.get(*id), Some(value));
                }
            }
        }
    }
}
