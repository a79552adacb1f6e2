#![no_main]

use libfuzzer_sys::fuzz_target;
use lfukit::ds::{FrequencyChain, SlotId};

// Fuzz arbitrary operation sequences on FrequencyChain
//
// Tests random sequences of push_new, promote, pop_lfu and peek_lfu,
// holding handles the same way LfuCache does.
fuzz_target!(|data: &[u8]| {
    let mut chain: FrequencyChain<u32, u32> = FrequencyChain::new();
    let mut handles: Vec<SlotId> = Vec::new();
    let mut next_key = 0u32;

    for chunk in data.chunks_exact(2) {
        match chunk[0] % 4 {
            0 => {
                // Push a fresh key at frequency 1
                handles.push(chain.push_new(next_key, u32::from(chunk[1])));
                next_key += 1;
            }
            1 => {
                // Promote an existing entry
                if !handles.is_empty() {
                    let id = handles[usize::from(chunk[1]) % handles.len()];
                    let before = chain.frequency(id);
                    let after = chain.promote(id);
                    assert_eq!(after, before.map(|f| f.saturating_add(1)));
                }
            }
            2 => {
                // Pop the LFU entry and drop its handle
                let expected = chain.peek_lfu().map(|(k, _, f)| (*k, f));
                if let Some((key, _, freq)) = chain.pop_lfu() {
                    assert_eq!(Some((key, freq)), expected);
                    handles.retain(|&id| chain.key(id).is_some_and(|k| *k != key));
                }
            }
            3 => {
                // Frequencies ascend strictly from the front
                let freqs: Vec<u64> = chain.frequencies().collect();
                assert!(freqs.windows(2).all(|w| w[0] < w[1]));
            }
            _ => unreachable!(),
        }

        assert_eq!(chain.len(), handles.len());
        assert!(chain.check_invariants().is_ok());
    }
});
