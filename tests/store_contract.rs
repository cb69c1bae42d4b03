use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ttlkv::{AnyStore, AnyValue, Store, StoreError};

fn is_not_found<V>(result: &ttlkv::Result<Option<V>>) -> bool {
    matches!(result, Err(StoreError::NotFound { .. }))
}

#[test]
fn test_expiry_scenario() {
    let store = Store::new();
    store.set("a", 1, Duration::from_millis(50));
    assert_eq!(store.get("a"), Ok(Some(1)));

    thread::sleep(Duration::from_millis(60));
    assert!(is_not_found(&store.get("a")));
    assert!(is_not_found(&store.get("a")));
}

#[test]
fn test_permanent_set_cancels_earlier_ttl() {
    let store = Store::new();
    store.set("k", "v1", Duration::from_millis(40));
    store.set("k", "v2", Duration::ZERO);

    thread::sleep(Duration::from_millis(70));
    assert_eq!(store.get("k"), Ok(Some("v2")));
}

#[test]
fn test_delete_then_get_is_a_successful_miss() {
    let store = Store::new();
    store.set("k", 5u8, Duration::from_secs(30));
    store.delete("k");
    assert_eq!(store.get("k"), Ok(None));
    assert_eq!(store.get("never"), Ok(None));
}

#[test]
fn test_type_erased_values() {
    let store = AnyStore::default();
    let value: AnyValue = Arc::new(3.5f64);
    store.set("pi-ish", value, Duration::ZERO);

    let got = store.get("pi-ish").unwrap().unwrap();
    assert_eq!(got.downcast_ref::<f64>(), Some(&3.5));
    assert!(got.downcast_ref::<u32>().is_none());
}

#[test]
fn test_overlapping_keys_keep_last_write_semantics() {
    const THREADS: u64 = 16;
    const ROUNDS: u64 = 500;
    const KEYS: u64 = 4;

    let store = Arc::new(Store::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for r in 0..ROUNDS {
                    let slot = (t + r) % KEYS;
                    let key = format!("k{}", slot);
                    match r % 4 {
                        0 => store.set(key, (slot, t, r), Duration::ZERO),
                        1 => store.set(key, (slot, t, r), Duration::from_micros(100)),
                        2 => {
                            if let Ok(Some((s, _, _))) = store.get(&key) {
                                assert_eq!(s, slot);
                            }
                        }
                        _ => store.delete(&key),
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    for slot in 0..KEYS {
        match store.get(&format!("k{}", slot)) {
            Ok(Some((s, t, r))) => {
                assert_eq!(s, slot);
                assert!(t < THREADS && r < ROUNDS);
                assert_eq!((t + r) % KEYS, slot);
                assert!(r % 4 == 0 || r % 4 == 1);
            }
            Ok(None) | Err(StoreError::NotFound { .. }) => {}
        }
    }
}
