//! Frequency chain for exact O(1) LFU ordering.
//!
//! Keeps every cached entry in a bucket keyed by its exact access count, and
//! keeps the buckets themselves in a doubly-linked chain ordered by ascending
//! frequency. Both levels are intrusive lists whose links are [`SlotId`]
//! handles into two [`SlotArena`]s, so no node ever holds a pointer to another.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                        FrequencyChain<K, V> Layout                          │
//! │                                                                             │
//! │   buckets: SlotArena<FrequencyBucket>       (slot 0 = sentinel, freq 0)     │
//! │                                                                             │
//! │        ┌──────────────────────────────────────────────────────────┐         │
//! │        ▼                                                          │         │
//! │   ┌──────────┐ next ┌─────────┐ next ┌─────────┐ next ┌─────────┐ │         │
//! │   │ sentinel │─────►│ freq=1  │─────►│ freq=2  │─────►│ freq=5  │─┘         │
//! │   │  freq=0  │◄─────│         │◄─────│         │◄─────│         │           │
//! │   └──────────┘ prev └─────────┘ prev └─────────┘ prev └─────────┘           │
//! │        │              │ head           │ head           │ head              │
//! │        │ prev = back  ▼                ▼                ▼                   │
//! │        │           [e4]◄─►[e1]       [e2]             [e0]◄─►[e3]            │
//! │        │            MRU    LRU                                              │
//! │        └─────────────────────────────────────────► (back = highest freq)    │
//! │                                                                             │
//! │   entries: SlotArena<Entry<K, V>>   each entry: prev/next/bucket handles    │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Front of the chain (`sentinel.next`) holds the eviction candidates; the
//! tail of the front bucket is the least recently touched of them. Within a
//! bucket, head = most recently touched.
//!
//! ## Promote Flow
//!
//! ```text
//!   promote(e1)           freq 1 → 2
//!     1. unlink e1 from its bucket
//!     2. bucket now empty? unlink and free it; anchor = its prev
//!        otherwise anchor = the bucket itself
//!     3. anchor.next has freq 2? reuse it
//!        otherwise splice a new freq-2 bucket right after anchor
//!     4. push e1 to the front of the target bucket
//! ```
//!
//! Frequencies only ever grow by one, so the target bucket is always the
//! anchor's immediate successor. No search is needed.
//!
//! ## Operations
//!
//! | Operation   | Time | Notes                                       |
//! |-------------|------|---------------------------------------------|
//! | `push_new`  | O(1) | New entry at freq 1, front of its bucket    |
//! | `promote`   | O(1) | Frequency + 1, move to MRU position         |
//! | `pop_lfu`   | O(1) | Tail of the lowest-frequency bucket         |
//! | `frequency` | O(1) | Entry → bucket → frequency                  |
//! | `iter`      | O(n) | Lazy, highest frequency first               |

use std::iter::FusedIterator;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Default bucket pre-allocation. Most entries cluster at low frequencies,
/// so the number of distinct frequencies rarely exceeds this.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    bucket: SlotId,
    key: K,
    value: V,
}

#[derive(Debug, Clone)]
struct FrequencyBucket {
    frequency: u64,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
    prev: SlotId,
    next: SlotId,
}

/// Arena-backed chain of frequency buckets with a sentinel.
///
/// Owns every entry. Callers keep the [`SlotId`] returned by
/// [`push_new`](Self::push_new) (typically in a hash index) and use it to
/// promote or read the entry in O(1).
///
/// # Example
///
/// ```
/// use lfukit::ds::FrequencyChain;
///
/// let mut chain = FrequencyChain::new();
/// let a = chain.push_new("a", 1);
/// let _b = chain.push_new("b", 2);
///
/// assert_eq!(chain.promote(a), Some(2));
/// assert_eq!(chain.frequency(a), Some(2));
///
/// // "b" is the only entry at the lowest frequency
/// assert_eq!(chain.pop_lfu(), Some(("b", 2, 1)));
///
/// let order: Vec<_> = chain.iter().map(|(k, _)| *k).collect();
/// assert_eq!(order, vec!["a"]);
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyChain<K, V> {
    entries: SlotArena<Entry<K, V>>,
    buckets: SlotArena<FrequencyBucket>,
    sentinel: SlotId,
}

impl<K, V> FrequencyChain<K, V> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty chain with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buckets = SlotArena::with_capacity(capacity.min(DEFAULT_BUCKET_PREALLOC) + 1);
        // Fresh arena: the sentinel lands in slot 0 and links to itself.
        let sentinel = buckets.insert(FrequencyBucket {
            frequency: 0,
            head: None,
            tail: None,
            len: 0,
            prev: SlotId(0),
            next: SlotId(0),
        });
        debug_assert_eq!(sentinel, SlotId(0));
        Self {
            entries: SlotArena::with_capacity(capacity),
            buckets,
            sentinel,
        }
    }

    /// Number of entries across all buckets.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct frequencies currently held.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len() - 1
    }

    /// Ascending distinct frequencies, front of the chain first.
    ///
    /// ```
    /// use lfukit::ds::FrequencyChain;
    ///
    /// let mut chain = FrequencyChain::new();
    /// let a = chain.push_new('a', ());
    /// chain.push_new('b', ());
    /// chain.promote(a);
    /// chain.promote(a);
    /// assert_eq!(chain.frequencies().collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    pub fn frequencies(&self) -> impl Iterator<Item = u64> + '_ {
        std::iter::successors(self.front_bucket(), move |&id| self.successor(id))
            .filter_map(move |id| self.buckets.get(id).map(|bucket| bucket.frequency))
    }

    /// Inserts a new entry at frequency 1, in front of any other frequency-1 entries.
    ///
    /// The caller is responsible for not inserting the same key twice.
    pub fn push_new(&mut self, key: K, value: V) -> SlotId {
        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            bucket: self.sentinel,
            key,
            value,
        });
        let linked = self.link_new(id);
        debug_assert!(linked.is_some(), "frequency chain corrupted on insert");
        id
    }

    /// Increments the entry's frequency and moves it to the front of its new bucket.
    ///
    /// Returns the new frequency, or `None` if `id` is not a live entry. At
    /// `u64::MAX` the frequency saturates; the entry is still moved to the front.
    #[inline]
    pub fn promote(&mut self, id: SlotId) -> Option<u64> {
        let bucket_id = self.entries.get(id)?.bucket;
        let current = self.buckets.get(bucket_id)?.frequency;
        if current == u64::MAX {
            self.list_unlink(id)?;
            self.list_push_front(bucket_id, id)?;
            return Some(current);
        }
        let next_freq = current + 1;

        self.list_unlink(id)?;
        let anchor = if self.buckets.get(bucket_id)?.len == 0 {
            self.unlink_bucket(bucket_id)?
        } else {
            bucket_id
        };

        let target = match self.successor(anchor) {
            Some(next) if self.buckets.get(next)?.frequency == next_freq => next,
            _ => self.link_bucket_after(anchor, next_freq)?,
        };
        self.list_push_front(target, id)?;
        Some(next_freq)
    }

    /// Removes and returns the eviction candidate as `(key, value, frequency)`.
    ///
    /// The candidate is the least recently touched entry of the lowest
    /// frequency bucket. Returns `None` on an empty chain.
    #[inline]
    pub fn pop_lfu(&mut self) -> Option<(K, V, u64)> {
        let front = self.front_bucket()?;
        let (victim, frequency) = {
            let bucket = self.buckets.get(front)?;
            (bucket.tail?, bucket.frequency)
        };

        self.list_unlink(victim)?;
        if self.buckets.get(front)?.len == 0 {
            self.unlink_bucket(front)?;
        }

        let entry = self.entries.remove(victim)?;
        Some((entry.key, entry.value, frequency))
    }

    /// Returns the entry [`pop_lfu`](Self::pop_lfu) would remove, without removing it.
    pub fn peek_lfu(&self) -> Option<(&K, &V, u64)> {
        let bucket = self.buckets.get(self.front_bucket()?)?;
        let entry = self.entries.get(bucket.tail?)?;
        Some((&entry.key, &entry.value, bucket.frequency))
    }

    /// Returns the frequency of a live entry.
    #[inline]
    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        let bucket = self.entries.get(id)?.bucket;
        self.buckets.get(bucket).map(|bucket| bucket.frequency)
    }

    #[inline]
    pub fn key(&self, id: SlotId) -> Option<&K> {
        self.entries.get(id).map(|entry| &entry.key)
    }

    #[inline]
    pub fn value(&self, id: SlotId) -> Option<&V> {
        self.entries.get(id).map(|entry| &entry.value)
    }

    #[inline]
    pub fn value_mut(&mut self, id: SlotId) -> Option<&mut V> {
        self.entries.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Lazily walks entries from the highest frequency down; within one
    /// frequency, most recently touched first.
    ///
    /// Nothing is collected up front. Dropping the iterator early stops the walk.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let back = self
            .buckets
            .get(self.sentinel)
            .map_or(self.sentinel, |sentinel| sentinel.prev);
        Iter {
            chain: self,
            bucket: back,
            entry: self.buckets.get(back).and_then(|bucket| bucket.head),
            remaining: self.len(),
        }
    }

    /// Verifies the structural invariants of the chain.
    ///
    /// Checks that the bucket ring closes through the sentinel, frequencies
    /// strictly increase front to back, no bucket is empty, every entry links
    /// back to the bucket that lists it, and all counts agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let sentinel = self
            .buckets
            .get(self.sentinel)
            .ok_or_else(|| InvariantError::new("sentinel bucket missing"))?;
        if sentinel.frequency != 0 || sentinel.len != 0 || sentinel.head.is_some() {
            return Err(InvariantError::new("sentinel bucket holds entries"));
        }

        let mut prev_id = self.sentinel;
        let mut prev_freq = 0u64;
        let mut current = sentinel.next;
        let mut buckets_seen = 0usize;
        let mut entries_seen = 0usize;

        while current != self.sentinel {
            if buckets_seen >= self.buckets.slot_count() {
                return Err(InvariantError::new("bucket chain does not close"));
            }
            let bucket = self
                .buckets
                .get(current)
                .ok_or_else(|| InvariantError::new(format!("dangling bucket link {current:?}")))?;
            if bucket.prev != prev_id {
                return Err(InvariantError::new(format!(
                    "bucket freq={} has prev {:?}, expected {:?}",
                    bucket.frequency, bucket.prev, prev_id
                )));
            }
            if bucket.frequency <= prev_freq {
                return Err(InvariantError::new(format!(
                    "bucket frequencies not strictly increasing: {} after {}",
                    bucket.frequency, prev_freq
                )));
            }
            if bucket.len == 0 || bucket.head.is_none() {
                return Err(InvariantError::new(format!(
                    "bucket freq={} is empty",
                    bucket.frequency
                )));
            }

            let mut last = None;
            let mut count = 0usize;
            let mut entry_cursor = bucket.head;
            while let Some(id) = entry_cursor {
                if count > bucket.len {
                    return Err(InvariantError::new(format!(
                        "entry list of bucket freq={} longer than its len",
                        bucket.frequency
                    )));
                }
                let entry = self
                    .entries
                    .get(id)
                    .ok_or_else(|| InvariantError::new(format!("dangling entry link {id:?}")))?;
                if entry.bucket != current {
                    return Err(InvariantError::new(format!(
                        "entry {id:?} points at bucket {:?}, listed in {current:?}",
                        entry.bucket
                    )));
                }
                if entry.prev != last {
                    return Err(InvariantError::new(format!(
                        "entry {id:?} has prev {:?}, expected {last:?}",
                        entry.prev
                    )));
                }
                last = Some(id);
                entry_cursor = entry.next;
                count += 1;
            }
            if bucket.tail != last || bucket.len != count {
                return Err(InvariantError::new(format!(
                    "bucket freq={} tail/len disagree with its list",
                    bucket.frequency
                )));
            }

            entries_seen += count;
            buckets_seen += 1;
            prev_freq = bucket.frequency;
            prev_id = current;
            current = bucket.next;
        }

        if sentinel.prev != prev_id {
            return Err(InvariantError::new("sentinel prev is not the back bucket"));
        }
        if buckets_seen != self.bucket_count() {
            return Err(InvariantError::new(format!(
                "{} buckets allocated, {} reachable",
                self.bucket_count(),
                buckets_seen
            )));
        }
        if entries_seen != self.entries.len() {
            return Err(InvariantError::new(format!(
                "{} entries allocated, {} reachable",
                self.entries.len(),
                entries_seen
            )));
        }
        Ok(())
    }

    fn front_bucket(&self) -> Option<SlotId> {
        let next = self.buckets.get(self.sentinel)?.next;
        (next != self.sentinel).then_some(next)
    }

    fn successor(&self, id: SlotId) -> Option<SlotId> {
        let next = self.buckets.get(id)?.next;
        (next != self.sentinel).then_some(next)
    }

    fn link_new(&mut self, id: SlotId) -> Option<()> {
        let target = match self.front_bucket() {
            Some(front) if self.buckets.get(front)?.frequency == 1 => front,
            _ => self.link_bucket_after(self.sentinel, 1)?,
        };
        self.list_push_front(target, id)
    }

    /// Splices an empty bucket for `frequency` directly after `anchor`.
    fn link_bucket_after(&mut self, anchor: SlotId, frequency: u64) -> Option<SlotId> {
        let next = self.buckets.get(anchor)?.next;
        let id = self.buckets.insert(FrequencyBucket {
            frequency,
            head: None,
            tail: None,
            len: 0,
            prev: anchor,
            next,
        });
        self.buckets.get_mut(anchor)?.next = id;
        self.buckets.get_mut(next)?.prev = id;
        Some(id)
    }

    /// Unlinks and frees a bucket, returning the bucket that preceded it.
    fn unlink_bucket(&mut self, id: SlotId) -> Option<SlotId> {
        debug_assert_ne!(id, self.sentinel, "sentinel bucket is never unlinked");
        let bucket = self.buckets.remove(id)?;
        self.buckets.get_mut(bucket.prev)?.next = bucket.next;
        self.buckets.get_mut(bucket.next)?.prev = bucket.prev;
        Some(bucket.prev)
    }

    fn list_push_front(&mut self, bucket_id: SlotId, id: SlotId) -> Option<()> {
        let old_head = self.buckets.get(bucket_id)?.head;
        {
            let entry = self.entries.get_mut(id)?;
            entry.prev = None;
            entry.next = old_head;
            entry.bucket = bucket_id;
        }
        match old_head {
            Some(head) => self.entries.get_mut(head)?.prev = Some(id),
            None => self.buckets.get_mut(bucket_id)?.tail = Some(id),
        }
        let bucket = self.buckets.get_mut(bucket_id)?;
        bucket.head = Some(id);
        bucket.len += 1;
        Some(())
    }

    fn list_unlink(&mut self, id: SlotId) -> Option<()> {
        let (prev, next, bucket_id) = {
            let entry = self.entries.get(id)?;
            (entry.prev, entry.next, entry.bucket)
        };
        match prev {
            Some(prev) => self.entries.get_mut(prev)?.next = next,
            None => self.buckets.get_mut(bucket_id)?.head = next,
        }
        match next {
            Some(next) => self.entries.get_mut(next)?.prev = prev,
            None => self.buckets.get_mut(bucket_id)?.tail = prev,
        }
        let entry = self.entries.get_mut(id)?;
        entry.prev = None;
        entry.next = None;
        let bucket = self.buckets.get_mut(bucket_id)?;
        bucket.len -= 1;
        Some(())
    }
}

impl<K, V> Default for FrequencyChain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy iterator over `(key, value)` pairs, highest frequency first.
///
/// Created by [`FrequencyChain::iter`]. Holds a shared borrow of the chain, so
/// the chain cannot be mutated while a traversal is in progress.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    chain: &'a FrequencyChain<K, V>,
    bucket: SlotId,
    entry: Option<SlotId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.entry {
                let entry = self.chain.entries.get(id)?;
                self.entry = entry.next;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&entry.key, &entry.value));
            }
            if self.bucket == self.chain.sentinel {
                return None;
            }
            self.bucket = self.chain.buckets.get(self.bucket)?.prev;
            self.entry = self.chain.buckets.get(self.bucket)?.head;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain,
            bucket: self.bucket,
            entry: self.entry,
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<K: Copy, V>(chain: &FrequencyChain<K, V>) -> Vec<K> {
        chain.iter().map(|(k, _)| *k).collect()
    }

    fn freqs<K, V>(chain: &FrequencyChain<K, V>) -> Vec<u64> {
        chain.frequencies().collect()
    }

    mod insertion {
        use super::*;

        #[test]
        fn push_into_empty_chain_creates_frequency_one_bucket() {
            let mut chain = FrequencyChain::new();
            let id = chain.push_new(1, "one");
            assert_eq!(chain.len(), 1);
            assert_eq!(chain.frequency(id), Some(1));
            assert_eq!(freqs(&chain), vec![1]);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn push_reuses_front_bucket_and_goes_to_its_head() {
            let mut chain = FrequencyChain::new();
            chain.push_new(1, ());
            chain.push_new(2, ());
            chain.push_new(3, ());
            assert_eq!(chain.bucket_count(), 1);
            assert_eq!(keys(&chain), vec![3, 2, 1]);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn push_creates_front_bucket_when_lowest_frequency_is_above_one() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            chain.promote(a);
            assert_eq!(freqs(&chain), vec![2]);

            let b = chain.push_new('b', ());
            assert_eq!(freqs(&chain), vec![1, 2]);
            assert_eq!(chain.frequency(b), Some(1));
            assert_eq!(keys(&chain), vec!['a', 'b']);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn with_capacity_starts_empty() {
            let chain: FrequencyChain<u8, u8> = FrequencyChain::with_capacity(128);
            assert!(chain.is_empty());
            assert_eq!(chain.bucket_count(), 0);
            assert_eq!(chain.iter().next(), None);
            chain.check_invariants().unwrap();
        }
    }

    mod promotion {
        use super::*;

        #[test]
        fn sole_entry_without_successor_moves_to_fresh_bucket() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            assert_eq!(chain.promote(a), Some(2));
            assert_eq!(freqs(&chain), vec![2]);
            assert_eq!(chain.bucket_count(), 1);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn sole_entry_joins_adjacent_successor() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            let b = chain.push_new('b', ());
            chain.promote(a); // a:2, b:1
            assert_eq!(chain.promote(b), Some(2)); // bucket 1 emptied, joins bucket 2
            assert_eq!(freqs(&chain), vec![2]);
            assert_eq!(keys(&chain), vec!['b', 'a']);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn sole_entry_splices_between_non_adjacent_buckets() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            chain.promote(a);
            chain.promote(a); // a:3
            let b = chain.push_new('b', ()); // b:1
            assert_eq!(freqs(&chain), vec![1, 3]);

            chain.promote(b); // b:2, bucket 1 discarded
            assert_eq!(freqs(&chain), vec![2, 3]);
            assert_eq!(keys(&chain), vec!['a', 'b']);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn shared_bucket_entry_joins_adjacent_successor() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            let b = chain.push_new('b', ());
            let _c = chain.push_new('c', ());
            chain.promote(a); // a:2
            chain.promote(b); // b:2, placed before a
            assert_eq!(freqs(&chain), vec![1, 2]);
            assert_eq!(keys(&chain), vec!['b', 'a', 'c']);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn shared_bucket_entry_creates_successor_at_back() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            let _b = chain.push_new('b', ());
            chain.promote(a);
            assert_eq!(freqs(&chain), vec![1, 2]);
            assert_eq!(chain.bucket_count(), 2);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn shared_bucket_entry_splices_before_higher_bucket() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            chain.promote(a);
            chain.promote(a); // a:3
            let b = chain.push_new('b', ());
            let _c = chain.push_new('c', ());
            chain.promote(b); // b:2 between 1 and 3
            assert_eq!(freqs(&chain), vec![1, 2, 3]);
            assert_eq!(keys(&chain), vec!['a', 'b', 'c']);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn promote_head_middle_and_tail_of_bucket() {
            let mut chain = FrequencyChain::new();
            let ids: Vec<_> = (0..5).map(|k| chain.push_new(k, ())).collect();
            // bucket 1 order: 4 3 2 1 0
            chain.promote(ids[4]); // head
            chain.promote(ids[2]); // middle
            chain.promote(ids[0]); // tail
            assert_eq!(keys(&chain), vec![0, 2, 4, 3, 1]);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn promote_unknown_id_is_none() {
            let mut chain: FrequencyChain<u8, ()> = FrequencyChain::new();
            assert_eq!(chain.promote(SlotId(7)), None);
            let id = chain.push_new(1, ());
            chain.pop_lfu();
            assert_eq!(chain.promote(id), None);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn promote_saturates_at_max_frequency() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            let b = chain.push_new('b', ());
            chain.promote(a);
            chain.promote(b); // both at 2, order: b a
            let bucket = chain.entries.get(a).map(|e| e.bucket).unwrap();
            chain.buckets.get_mut(bucket).unwrap().frequency = u64::MAX;

            assert_eq!(chain.promote(a), Some(u64::MAX));
            assert_eq!(chain.frequency(a), Some(u64::MAX));
            assert_eq!(keys(&chain), vec!['a', 'b']);
            assert_eq!(chain.bucket_count(), 1);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn freed_bucket_slot_is_reused_safely() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            for expected in 2..=50 {
                assert_eq!(chain.promote(a), Some(expected));
                chain.check_invariants().unwrap();
            }
            assert_eq!(chain.bucket_count(), 1);
            // sentinel + one live bucket + at most one vacant slot
            assert!(chain.buckets.slot_count() <= 3);
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn pop_lfu_on_empty_chain() {
            let mut chain: FrequencyChain<u8, u8> = FrequencyChain::new();
            assert_eq!(chain.pop_lfu(), None);
            assert_eq!(chain.peek_lfu(), None);
        }

        #[test]
        fn pop_lfu_takes_least_recent_of_lowest_frequency() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', 10);
            chain.push_new('b', 20);
            chain.push_new('c', 30);
            chain.promote(a);

            assert_eq!(chain.peek_lfu(), Some((&'b', &20, 1)));
            assert_eq!(chain.pop_lfu(), Some(('b', 20, 1)));
            assert_eq!(chain.pop_lfu(), Some(('c', 30, 1)));
            assert_eq!(freqs(&chain), vec![2]);
            assert_eq!(chain.pop_lfu(), Some(('a', 10, 2)));
            assert!(chain.is_empty());
            assert_eq!(chain.bucket_count(), 0);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn pop_lfu_keeps_bucket_that_still_has_entries() {
            let mut chain = FrequencyChain::new();
            chain.push_new(1, ());
            chain.push_new(2, ());
            chain.pop_lfu();
            assert_eq!(chain.bucket_count(), 1);
            assert_eq!(keys(&chain), vec![2]);
            chain.check_invariants().unwrap();
        }

        #[test]
        fn chain_is_reusable_after_draining() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            chain.promote(a);
            chain.pop_lfu();
            let b = chain.push_new('b', ());
            assert_eq!(chain.frequency(b), Some(1));
            assert_eq!(freqs(&chain), vec![1]);
            chain.check_invariants().unwrap();
        }
    }

    mod iteration {
        use super::*;

        #[test]
        fn iter_descends_by_frequency_then_recency() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', 1);
            let b = chain.push_new('b', 2);
            let c = chain.push_new('c', 3);
            chain.promote(a);
            chain.promote(b);
            chain.promote(c);
            chain.promote(a);

            let pairs: Vec<_> = chain.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(pairs, vec![('a', 1), ('c', 3), ('b', 2)]);
        }

        #[test]
        fn iter_is_exact_size_and_fused() {
            let mut chain = FrequencyChain::new();
            for k in 0..4 {
                chain.push_new(k, ());
            }
            let mut iter = chain.iter();
            assert_eq!(iter.len(), 4);
            iter.next();
            assert_eq!(iter.len(), 3);
            let rest: Vec<_> = iter.by_ref().collect();
            assert_eq!(rest.len(), 3);
            assert_eq!(iter.next(), None);
            assert_eq!(iter.next(), None);
        }

        #[test]
        fn iter_stops_early_without_walking_further() {
            let mut chain = FrequencyChain::new();
            for k in 0..100 {
                chain.push_new(k, ());
            }
            let first_three: Vec<_> = chain.iter().take(3).map(|(k, _)| *k).collect();
            assert_eq!(first_three, vec![99, 98, 97]);
        }

        #[test]
        fn value_mut_is_visible_through_iter() {
            let mut chain = FrequencyChain::new();
            let id = chain.push_new("k", 1);
            if let Some(v) = chain.value_mut(id) {
                *v = 2;
            }
            assert_eq!(chain.value(id), Some(&2));
            assert_eq!(chain.key(id), Some(&"k"));
            assert_eq!(chain.iter().next(), Some((&"k", &2)));
        }
    }

    mod invariants {
        use super::*;

        #[test]
        fn detects_len_mismatch() {
            let mut chain = FrequencyChain::new();
            let id = chain.push_new(1, ());
            let bucket = chain.entries.get(id).map(|e| e.bucket).unwrap();
            chain.buckets.get_mut(bucket).unwrap().len = 5;
            assert!(chain.check_invariants().is_err());
        }

        #[test]
        fn detects_out_of_order_frequencies() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            chain.push_new('b', ());
            chain.promote(a);
            let bucket = chain.entries.get(a).map(|e| e.bucket).unwrap();
            chain.buckets.get_mut(bucket).unwrap().frequency = 1;
            let err = chain.check_invariants().unwrap_err();
            assert!(err.message().contains("strictly increasing"));
        }

        #[test]
        fn detects_wrong_back_reference() {
            let mut chain = FrequencyChain::new();
            let a = chain.push_new('a', ());
            chain.push_new('b', ());
            chain.promote(a);
            let sentinel = chain.sentinel;
            chain.entries.get_mut(a).unwrap().bucket = sentinel;
            assert!(chain.check_invariants().is_err());
        }
    }
}
