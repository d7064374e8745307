mod common;

use clipstore::domain::error::ClipError;
use common::{abc_store, memory_store};

#[test]
fn test_insert_then_contains_then_remove() {
    let store = memory_store(3);
    assert!(store.insert("cat.jpg", vec![0.0, 0.6, 0.8]).unwrap());
    assert!(store.contains("cat.jpg").unwrap());
    assert!(store.remove("cat.jpg").unwrap());
    assert!(!store.contains("cat.jpg").unwrap());
    assert_eq!(store.size().unwrap(), 0);
}

#[test]
fn test_duplicate_insert_is_noop() {
    let store = memory_store(2);
    assert!(store.insert("k", vec![1.0, 0.0]).unwrap());
    assert!(!store.insert("k", vec![0.0, 1.0]).unwrap());
    assert_eq!(store.size().unwrap(), 1);
    // first vector wins
    assert_eq!(store.get("k").unwrap().unwrap(), vec![1.0, 0.0]);
}

#[test]
fn test_remove_missing_key_returns_false() {
    let store = memory_store(2);
    assert!(!store.remove("ghost").unwrap());
}

#[test]
fn test_wrong_dimension_is_invalid_argument() {
    let store = memory_store(4);
    let err = store.insert("k", vec![1.0, 0.0]).unwrap_err();
    assert!(matches!(err, ClipError::InvalidArgument(_)));
    assert_eq!(store.size().unwrap(), 0);
}

#[test]
fn test_bad_keys_are_invalid_argument() {
    let store = memory_store(2);
    assert!(store.insert("", vec![1.0, 0.0]).unwrap_err().is_invalid_argument());
    assert!(store.insert(&"x".repeat(64), vec![1.0, 0.0]).unwrap_err().is_invalid_argument());
    assert!(store.insert(&"x".repeat(63), vec![1.0, 0.0]).unwrap());
}

#[test]
fn test_non_finite_components_are_rejected() {
    let store = memory_store(2);
    assert!(store.insert("k", vec![f32::INFINITY, 0.0]).unwrap_err().is_invalid_argument());
}

#[test]
fn test_upsert_replaces_in_place() {
    let store = abc_store();
    assert!(!store.upsert("A", vec![0.0, 1.0]).unwrap());
    assert_eq!(store.keys().unwrap(), vec!["A", "B", "C"]);
    assert_eq!(store.get("A").unwrap().unwrap(), vec![0.0, 1.0]);
    assert!(store.upsert("D", vec![1.0, 0.0]).unwrap());
    assert_eq!(store.size().unwrap(), 4);
}

#[test]
fn test_keys_keep_insertion_order_across_removal() {
    let store = abc_store();
    store.remove("B").unwrap();
    store.insert("B", vec![0.0, 1.0]).unwrap();
    assert_eq!(store.keys().unwrap(), vec!["A", "C", "B"]);
    assert!(store.contains("C").unwrap());
}

#[test]
fn test_zero_dimension_store_is_rejected() {
    use clipstore::application::store::{FeatureStore, StoreOptions};
    use clipstore::infrastructure::memory::MemoryRepo;
    use std::sync::Arc;

    let err = FeatureStore::open(Arc::new(MemoryRepo), StoreOptions::new(0)).err().unwrap();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_use_after_destroy_fails_fast() {
    let store = abc_store();
    store.destroy().unwrap();
    assert!(store.is_destroyed());
    assert!(matches!(store.contains("A"), Err(ClipError::Destroyed)));
    assert!(matches!(store.insert("D", vec![1.0, 0.0]), Err(ClipError::Destroyed)));
    assert!(matches!(store.query(&[1.0, 0.0], 1), Err(ClipError::Destroyed)));
    assert!(matches!(store.persist(), Err(ClipError::Destroyed)));
    assert!(matches!(store.destroy(), Err(ClipError::Destroyed)));
}

#[test]
fn test_concurrent_readers_and_writer() {
    use std::sync::Arc;
    use std::thread;

    let store = Arc::new(memory_store(8));
    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for i in 0..200u64 {
                store.insert(&format!("img-{i}"), common::unit_vector(i, 8)).unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|r| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let hits = store.query(&common::unit_vector(r, 8), 5).unwrap();
                    assert!(hits.len() <= 5);
                    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
    assert_eq!(store.size().unwrap(), 200);
}
