mod common;

use common::{abc_store, memory_store, unit_vector};

#[test]
fn test_walkthrough_top_two() {
    let store = abc_store();
    let results = store.query(&[1.0, 0.0], 2).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].key, "A");
    assert!((results[0].score - 1.0).abs() < 1e-4);
    assert_eq!(results[1].key, "C");
    assert!((results[1].score - 0.7071).abs() < 1e-3);
}

#[test]
fn test_result_length_is_min_of_k_and_size() {
    let store = memory_store(16);
    for i in 0..25u64 {
        store.insert(&format!("img{i:03}.jpg"), unit_vector(i, 16)).unwrap();
    }
    let q = unit_vector(999, 16);
    assert_eq!(store.query(&q, 1).unwrap().len(), 1);
    assert_eq!(store.query(&q, 10).unwrap().len(), 10);
    assert_eq!(store.query(&q, 25).unwrap().len(), 25);
    assert_eq!(store.query(&q, 1000).unwrap().len(), 25);
}

#[test]
fn test_oversized_top_k_returns_every_entry() {
    let store = memory_store(2);
    store.insert("A", vec![1.0, 0.0]).unwrap();
    store.insert("B", vec![0.0, 1.0]).unwrap();
    assert_eq!(store.query(&[1.0, 0.0], usize::MAX).unwrap().len(), 2);
    assert_eq!(store.query(&[1.0, 0.0], 1 << 40).unwrap().len(), 2);
}

#[test]
fn test_scores_are_non_increasing() {
    let store = memory_store(32);
    for i in 0..100u64 {
        store.insert(&i.to_string(), unit_vector(i, 32)).unwrap();
    }
    let results = store.query(&unit_vector(7_000, 32), 40).unwrap();
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(results.iter().all(|r| (-1.0..=1.0001).contains(&r.score)));
}

#[test]
fn test_self_query_ranks_first() {
    let store = memory_store(64);
    for i in 0..50u64 {
        store.insert(&format!("k{i}"), unit_vector(i, 64)).unwrap();
    }
    let target = unit_vector(17, 64);
    let results = store.query(&target, 3).unwrap();
    assert_eq!(results[0].key, "k17");
    assert!((results[0].score - 1.0).abs() < 1e-5);
}

#[test]
fn test_ties_break_by_insertion_order() {
    let store = memory_store(2);
    store.insert("second-best", vec![0.6, 0.8]).unwrap();
    store.insert("tie-1", vec![1.0, 0.0]).unwrap();
    store.insert("tie-2", vec![1.0, 0.0]).unwrap();
    store.insert("tie-3", vec![1.0, 0.0]).unwrap();

    for _ in 0..5 {
        let keys: Vec<_> = store.query(&[1.0, 0.0], 3).unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, ["tie-1", "tie-2", "tie-3"]);
    }

    // removing and re-adding moves a key to the back of the tie
    store.remove("tie-1").unwrap();
    store.insert("tie-1", vec![1.0, 0.0]).unwrap();
    let keys: Vec<_> = store.query(&[1.0, 0.0], 3).unwrap().into_iter().map(|r| r.key).collect();
    assert_eq!(keys, ["tie-2", "tie-3", "tie-1"]);
}

#[test]
fn test_unnormalized_vectors_are_normalized_before_scoring() {
    let store = memory_store(2);
    store.insert("long", vec![10.0, 0.0]).unwrap();
    store.insert("diag", vec![3.0, 3.0]).unwrap();
    let results = store.query(&[0.5, 0.0], 2).unwrap();
    assert_eq!(results[0].key, "long");
    assert!((results[0].score - 1.0).abs() < 1e-5);
    assert!((results[1].score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
}

#[test]
fn test_zero_top_k_is_invalid_argument() {
    let store = abc_store();
    assert!(store.query(&[1.0, 0.0], 0).unwrap_err().is_invalid_argument());
}

#[test]
fn test_query_dimension_mismatch_is_invalid_argument() {
    let store = abc_store();
    assert!(store.query(&[1.0, 0.0, 0.0], 2).unwrap_err().is_invalid_argument());
}

#[test]
fn test_query_on_empty_store_is_empty() {
    let store = memory_store(2);
    assert!(store.query(&[1.0, 0.0], 5).unwrap().is_empty());
}

#[test]
fn test_opposite_vector_scores_negative() {
    let store = abc_store();
    let results = store.query(&[-1.0, 0.0], 3).unwrap();
    assert_eq!(results.last().unwrap().key, "A");
    assert!((results.last().unwrap().score + 1.0).abs() < 1e-5);
}

mod pluggable_index {
    use clipstore::application::ranker::LinearScan;
    use clipstore::application::store::{FeatureStore, StoreOptions};
    use clipstore::domain::entities::feature_entry::FeatureEntry;
    use clipstore::domain::ports::similarity_index::{Scored, SimilarityIndex};
    use clipstore::domain::values::feature_vector::FeatureVector;
    use clipstore::infrastructure::memory::MemoryRepo;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Delegates to the linear scan and counts maintenance hooks.
    struct Tracking {
        live: Arc<AtomicUsize>,
    }

    impl SimilarityIndex for Tracking {
        fn name(&self) -> &'static str {
            "tracking"
        }

        fn search(&self, entries: &[FeatureEntry], query: &FeatureVector, top_k: usize) -> Vec<Scored> {
            LinearScan.search(entries, query, top_k)
        }

        fn inserted(&mut self, _position: usize, _entry: &FeatureEntry) {
            self.live.fetch_add(1, Ordering::SeqCst);
        }

        fn removed(&mut self, _position: usize) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_custom_index_sees_every_mutation() {
        let live = Arc::new(AtomicUsize::new(0));
        let store = FeatureStore::open(
            Arc::new(MemoryRepo),
            StoreOptions::new(2).with_index(Box::new(Tracking { live: live.clone() })),
        )
        .unwrap();

        store.insert("a", vec![1.0, 0.0]).unwrap();
        store.insert("b", vec![0.0, 1.0]).unwrap();
        store.insert("a", vec![0.0, 1.0]).unwrap();
        store.remove("b").unwrap();
        store.remove("missing").unwrap();

        assert_eq!(live.load(Ordering::SeqCst), 1);
        assert_eq!(store.query(&[1.0, 0.0], 5).unwrap()[0].key, "a");
    }
}
