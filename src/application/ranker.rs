use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::ports::similarity_index::{Scored, SimilarityIndex};
use crate::domain::values::feature_vector::FeatureVector;
use crate::domain::values::score::log_sum_exp;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Cosine similarity, accumulated in f64. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 { 0.0 } else { (dot / denom) as f32 }
}

/// Heap element ordered so that "greater" means a better hit: higher cosine,
/// then earlier insertion position.
#[derive(Clone, Copy)]
struct Candidate(Scored);

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .cosine
            .total_cmp(&other.0.cosine)
            .then_with(|| other.0.position.cmp(&self.0.position))
    }
}

/// Bounded top-K selection: keeps a min-heap of the K best seen so far.
///
/// Capacity is bounded by the input, so an oversized `top_k` returns everything.
pub fn select_top_k(scores: impl IntoIterator<Item = Scored>, top_k: usize) -> Vec<Scored> {
    if top_k == 0 {
        return Vec::new();
    }
    let scores = scores.into_iter();
    let (lower, _) = scores.size_hint();
    let mut heap: BinaryHeap<Reverse<Candidate>> =
        BinaryHeap::with_capacity(top_k.min(lower).saturating_add(1));
    for s in scores {
        let c = Candidate(s);
        if heap.len() < top_k {
            heap.push(Reverse(c));
        } else if let Some(Reverse(worst)) = heap.peek() {
            if c > *worst {
                heap.pop();
                heap.push(Reverse(c));
            }
        }
    }
    // ascending Reverse<Candidate> == descending Candidate
    heap.into_sorted_vec().into_iter().map(|Reverse(c)| c.0).collect()
}

/// `ln(sum(exp(scale * cosine)))` over every entry, used by softmax scoring.
pub fn log_partition(entries: &[FeatureEntry], query: &FeatureVector, scale: f32) -> f32 {
    log_sum_exp(
        entries
            .iter()
            .map(|e| scale * cosine_similarity(query.as_slice(), e.vector.as_slice())),
    )
}

/// Exhaustive scan: O(N·D + N·log K). The default for stores in the low thousands.
#[derive(Debug, Default)]
pub struct LinearScan;

impl SimilarityIndex for LinearScan {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn search(&self, entries: &[FeatureEntry], query: &FeatureVector, top_k: usize) -> Vec<Scored> {
        let scores = entries.iter().enumerate().map(|(position, e)| Scored {
            position,
            cosine: cosine_similarity(query.as_slice(), e.vector.as_slice()),
        });
        select_top_k(scores, top_k.min(entries.len()))
    }
}
