//! Run with: cargo run --example basic_lfu

use lfukit::prelude::*;

fn main() {
    let mut cache: LfuCache<&str, String> = LfuCache::new(2);

    cache.put("a", "alpha".to_string());
    cache.put("b", "beta".to_string());

    let _ = cache.get(&"a");
    cache.put("c", "gamma".to_string());

    println!("contains a? {}", cache.contains(&"a"));
    println!("contains b? {}", cache.contains(&"b"));
    println!("frequency of a: {:?}", cache.frequency(&"a"));

    for (key, value) in &cache {
        println!("{key} => {value}");
    }

    match LfuCacheBuilder::new().capacity(-1).try_build::<&str, String>() {
        Ok(_) => println!("unexpected cache"),
        Err(err) => println!("rejected: {err}"),
    }
}

// Expected output:
// contains a? true
// contains b? false
// frequency of a: Ok(2)
// a => alpha
// c => gamma
// rejected: invalid capacity -1: capacity must be >= 0
//
// Explanation: capacity=2; "a" is accessed before inserting "c", so "b" is evicted.
