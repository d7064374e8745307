use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::values::feature_vector::FeatureVector;

/// A hit by position in the store's insertion-ordered entry list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub position: usize,
    pub cosine: f32,
}

/// Nearest-neighbor strategy over the store's entries.
///
/// `search` must return at most `top_k` hits ordered by descending cosine,
/// equal scores by ascending position. An approximate index keeps its own
/// structure current through `inserted`/`removed`/`replaced`.
pub trait SimilarityIndex: Send + Sync {
    fn name(&self) -> &'static str;

    fn search(&self, entries: &[FeatureEntry], query: &FeatureVector, top_k: usize) -> Vec<Scored>;

    fn inserted(&mut self, _position: usize, _entry: &FeatureEntry) {}

    fn removed(&mut self, _position: usize) {}

    fn replaced(&mut self, _position: usize, _entry: &FeatureEntry) {}

    fn rebuild(&mut self, _entries: &[FeatureEntry]) {}
}
