//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache's invariants over arbitrary operation
//! sequences. Time is driven by a manual clock, so no test sleeps.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheManager, DEFAULT_STORAGE_PREFIX};
use crate::clock::ManualClock;
use crate::storage::{DurableStore, MemoryStore};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);
const START_MS: u64 = 1_700_000_000_000;

fn test_cache(max_entries: usize) -> (CacheManager, ManualClock) {
    let clock = ManualClock::new(START_MS);
    let cache = CacheManager::new("prop", max_entries, TEST_DEFAULT_TTL)
        .with_clock(Arc::new(clock.clone()));
    (cache, clock)
}

// == Strategies ==
/// Generates cache keys shaped like the dashboard's endpoint keys
fn key_strategy() -> impl Strategy<Value = String> {
    ("(games|teams|players|users)", "[a-z0-9]{0,6}")
        .prop_map(|(endpoint, suffix)| format!("{}_{}", endpoint, suffix))
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,32}".prop_map(|s| json!(s)),
        prop::collection::vec(any::<u16>(), 0..5).prop_map(|v| json!(v)),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses reflect exactly what get returned.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let (mut cache, _) = test_cache(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value, None),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => cache.delete(&key),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, cache.len(), "Total entries mismatch");
    }

    // The last write to a key is what get returns.
    #[test]
    fn prop_last_write_wins(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let (mut cache, _) = test_cache(TEST_MAX_ENTRIES);

        cache.set(key.clone(), value1, None);
        cache.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(cache.get(&key), Some(value2));
        prop_assert_eq!(cache.len(), 1);
    }

    // The cache never holds more than its capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200),
        max_entries in 1usize..20
    ) {
        let (mut cache, _) = test_cache(max_entries);

        for (key, value) in entries {
            cache.set(key, value, None);
            prop_assert!(
                cache.len() <= max_entries,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_entries
            );
        }
    }

    // Eviction follows a simple FIFO queue model, whatever reads happen.
    #[test]
    fn prop_eviction_matches_fifo_model(
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
        max_entries in 1usize..8
    ) {
        let (mut cache, _) = test_cache(max_entries);
        let mut model: VecDeque<String> = VecDeque::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value, None);
                    let present = model.iter().any(|k| k == &key);
                    model.retain(|k| k != &key);
                    if !present && model.len() >= max_entries {
                        model.pop_front();
                    }
                    model.push_back(key);
                }
                CacheOp::Get { key } => {
                    cache.get(&key);
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.retain(|k| k != &key);
                }
            }
        }

        prop_assert_eq!(cache.keys(), Vec::from(model));
    }

    // Entries are valid strictly before their TTL elapses and gone after.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in key_strategy(),
        value in value_strategy(),
        ttl_ms in 1u64..100_000,
        before in 0u64..100_000
    ) {
        let (mut cache, clock) = test_cache(TEST_MAX_ENTRIES);
        cache.set(key.clone(), value.clone(), Some(Duration::from_millis(ttl_ms)));

        let elapsed = before % ttl_ms;
        clock.advance(Duration::from_millis(elapsed));
        prop_assert_eq!(cache.get(&key), Some(value));

        clock.advance(Duration::from_millis(ttl_ms - elapsed));
        prop_assert_eq!(cache.get(&key), None);
        prop_assert!(!cache.has(&key));
    }

    // Pattern deletion removes exactly the keys containing the pattern.
    #[test]
    fn prop_delete_matching_scope(
        keys in prop::collection::vec(key_strategy(), 1..30),
        pattern in "(games|teams|players|users)"
    ) {
        let (mut cache, _) = test_cache(TEST_MAX_ENTRIES);
        for key in &keys {
            cache.set(key.clone(), json!(null), None);
        }

        cache.delete_matching(&pattern);

        for key in cache.keys() {
            prop_assert!(!key.contains(&pattern));
        }
        for key in &keys {
            if !key.contains(&pattern) {
                prop_assert!(cache.has(key));
            }
        }
    }

    // Clearing a durable cache never removes records outside its prefix.
    #[test]
    fn prop_clear_preserves_foreign_records(
        cached in prop::collection::vec(key_strategy(), 0..10),
        foreign in prop::collection::vec("[a-z]{1,8}", 0..10)
    ) {
        let store = MemoryStore::new();
        for key in &foreign {
            store.set_item(key, "foreign").unwrap();
        }
        let mut cache = CacheManager::new("prop", TEST_MAX_ENTRIES, TEST_DEFAULT_TTL)
            .with_storage(Arc::new(store.clone()), DEFAULT_STORAGE_PREFIX);
        for key in &cached {
            cache.set(key.clone(), json!(1), None);
        }

        cache.clear();

        for key in &foreign {
            prop_assert_eq!(store.get_item(key).unwrap(), Some("foreign".to_string()));
        }
        for key in &cached {
            prop_assert_eq!(store.get_item(&format!("{}{}", DEFAULT_STORAGE_PREFIX, key)).unwrap(), None);
        }
    }
}
