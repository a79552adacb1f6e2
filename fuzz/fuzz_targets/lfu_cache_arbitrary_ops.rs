#![no_main]

use libfuzzer_sys::fuzz_target;
use lfukit::policy::lfu::LfuCache;

// Fuzz arbitrary operation sequences on LfuCache
//
// The first byte picks the capacity; every following triple is
// (op, key, value). Invariants are checked after each mutation.
fuzz_target!(|data: &[u8]| {
    let Some((&cap, rest)) = data.split_first() else {
        return;
    };

    let mut cache: LfuCache<u8, u8> = LfuCache::new(usize::from(cap % 16));

    for chunk in rest.chunks_exact(3) {
        let key = chunk[1];
        let value = chunk[2];

        match chunk[0] % 6 {
            0 => {
                // Put
                let was_full = cache.len() == cache.capacity();
                let existed = cache.contains(&key);
                cache.put(key, value);
                if cache.capacity() > 0 {
                    assert_eq!(cache.peek(&key), Some(&value));
                }
                if was_full && !existed {
                    assert_eq!(cache.len(), cache.capacity());
                }
            }
            1 => {
                // Get
                let before = cache.frequency(&key).ok();
                let hit = cache.get(&key).is_ok();
                assert_eq!(hit, before.is_some());
                if let Some(freq) = before {
                    assert_eq!(cache.frequency(&key), Ok(freq.saturating_add(1)));
                }
            }
            2 => {
                // Frequency (read-only)
                let _ = cache.frequency(&key);
            }
            3 => {
                // Peek LFU (read-only)
                let _ = cache.peek_lfu();
            }
            4 => {
                // Full enumeration must be non-increasing in frequency
                let freqs: Vec<u64> = cache
                    .iter()
                    .filter_map(|(k, _)| cache.frequency(k).ok())
                    .collect();
                assert_eq!(freqs.len(), cache.len());
                assert!(freqs.windows(2).all(|w| w[0] >= w[1]));
            }
            5 => {
                // Partial enumeration
                let _ = cache.iter().take(usize::from(value % 4)).count();
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= cache.capacity());
        assert!(cache.check_invariants().is_ok());
    }
});
