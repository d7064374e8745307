use crate::application::ranker::{log_partition, LinearScan};
use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::entities::match_item::MatchItem;
use crate::domain::error::ClipError;
use crate::domain::ports::feature_repository::FeatureRepository;
use crate::domain::ports::similarity_index::SimilarityIndex;
use crate::domain::values::feature_key::FeatureKey;
use crate::domain::values::feature_vector::FeatureVector;
use crate::domain::values::score::ScoreTransform;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct StoreOptions {
    pub dimension: usize,
    pub index: Box<dyn SimilarityIndex>,
    pub flush_on_destroy: bool,
}

impl StoreOptions {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            index: Box::new(LinearScan),
            flush_on_destroy: true,
        }
    }

    pub fn with_index(mut self, index: Box<dyn SimilarityIndex>) -> Self {
        self.index = index;
        self
    }

    pub fn flush_on_destroy(mut self, flush: bool) -> Self {
        self.flush_on_destroy = flush;
        self
    }
}

struct StoreState {
    entries: Vec<FeatureEntry>,
    positions: HashMap<FeatureKey, usize>,
    index: Box<dyn SimilarityIndex>,
}

impl StoreState {
    fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    fn reindex_from(&mut self, start: usize) {
        for (i, e) in self.entries.iter().enumerate().skip(start) {
            self.positions.insert(e.key.clone(), i);
        }
    }
}

/// Keyed feature store with cosine top-K search.
///
/// Readers (`query`, `contains`, `size`, `get`, `keys`) share the lock;
/// writers (`insert`, `upsert`, `remove`, `persist`, `destroy`) hold it
/// exclusively. Every call after `destroy` fails with [`ClipError::Destroyed`].
pub struct FeatureStore {
    dimension: usize,
    repo: Arc<dyn FeatureRepository>,
    flush_on_destroy: bool,
    state: RwLock<Option<StoreState>>,
}

impl FeatureStore {
    /// Loads every persisted entry from `repo` and builds the index over them.
    pub fn open(repo: Arc<dyn FeatureRepository>, options: StoreOptions) -> Result<Self, ClipError> {
        let StoreOptions { dimension, mut index, flush_on_destroy } = options;
        if dimension == 0 {
            return Err(ClipError::InvalidArgument("dimension must be positive".into()));
        }

        let entries = repo.load()?;
        let mut positions = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            if e.vector.dimension() != dimension {
                return Err(ClipError::Storage(format!(
                    "entry {} has dimension {}, expected {dimension}",
                    e.key,
                    e.vector.dimension()
                )));
            }
            if positions.insert(e.key.clone(), i).is_some() {
                return Err(ClipError::Storage(format!("duplicate key {} in storage", e.key)));
            }
        }
        index.rebuild(&entries);

        tracing::info!(
            backend = %repo.describe(),
            dimension,
            entries = entries.len(),
            index = index.name(),
            "Feature store opened"
        );

        Ok(Self {
            dimension,
            repo,
            flush_on_destroy,
            state: RwLock::new(Some(StoreState { entries, positions, index })),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Adds `key`. Returns `false` without touching anything if the key exists.
    pub fn insert(&self, key: &str, vector: Vec<f32>) -> Result<bool, ClipError> {
        let key = FeatureKey::new(key)?;
        let vector = FeatureVector::with_dimension(vector, self.dimension)?;

        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(ClipError::Destroyed)?;
        if state.position(key.as_str()).is_some() {
            tracing::debug!(key = %key, "Key already present, insert skipped");
            return Ok(false);
        }
        Self::push(&*self.repo, state, FeatureEntry::new(key, vector))?;
        Ok(true)
    }

    /// Adds `key` or replaces its vector in place, keeping its insertion position.
    /// Returns `true` if the key was new.
    pub fn upsert(&self, key: &str, vector: Vec<f32>) -> Result<bool, ClipError> {
        let key = FeatureKey::new(key)?;
        let vector = FeatureVector::with_dimension(vector, self.dimension)?;

        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(ClipError::Destroyed)?;
        let entry = FeatureEntry::new(key, vector);
        match state.position(entry.key.as_str()) {
            Some(pos) => {
                self.repo.put(&entry)?;
                state.index.replaced(pos, &entry);
                state.entries[pos] = entry;
                Ok(false)
            }
            None => {
                Self::push(&*self.repo, state, entry)?;
                Ok(true)
            }
        }
    }

    fn push(repo: &dyn FeatureRepository, state: &mut StoreState, entry: FeatureEntry) -> Result<(), ClipError> {
        repo.put(&entry)?;
        let pos = state.entries.len();
        state.positions.insert(entry.key.clone(), pos);
        state.index.inserted(pos, &entry);
        state.entries.push(entry);
        Ok(())
    }

    /// Deletes `key`. Returns `false` if it was absent.
    pub fn remove(&self, key: &str) -> Result<bool, ClipError> {
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(ClipError::Destroyed)?;
        let Some(pos) = state.position(key) else {
            return Ok(false);
        };
        self.repo.delete(&state.entries[pos].key)?;
        let removed = state.entries.remove(pos);
        state.positions.remove(removed.key.as_str());
        state.reindex_from(pos);
        state.index.removed(pos);
        Ok(true)
    }

    pub fn contains(&self, key: &str) -> Result<bool, ClipError> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(ClipError::Destroyed)?;
        Ok(state.position(key).is_some())
    }

    pub fn size(&self) -> Result<usize, ClipError> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(ClipError::Destroyed)?;
        Ok(state.entries.len())
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<f32>>, ClipError> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(ClipError::Destroyed)?;
        Ok(state
            .position(key)
            .map(|pos| state.entries[pos].vector.as_slice().to_vec()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Result<Vec<String>, ClipError> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(ClipError::Destroyed)?;
        Ok(state.entries.iter().map(|e| e.key.to_string()).collect())
    }

    /// Copy of every entry in insertion order.
    pub fn entries(&self) -> Result<Vec<FeatureEntry>, ClipError> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(ClipError::Destroyed)?;
        Ok(state.entries.clone())
    }

    /// Top-K entries by cosine similarity to `vector`.
    pub fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<MatchItem>, ClipError> {
        self.query_with(vector, top_k, ScoreTransform::Cosine)
    }

    /// Ranks by cosine similarity and reports scores through `transform`.
    pub fn query_with(
        &self,
        vector: &[f32],
        top_k: usize,
        transform: ScoreTransform,
    ) -> Result<Vec<MatchItem>, ClipError> {
        if top_k == 0 {
            return Err(ClipError::InvalidArgument("top_k must be positive".into()));
        }
        let query = FeatureVector::with_dimension(vector.to_vec(), self.dimension)?;

        let guard = self.state.read();
        let state = guard.as_ref().ok_or(ClipError::Destroyed)?;
        let hits = state.index.search(&state.entries, &query, top_k);
        let lp = match transform.partition_scale() {
            Some(scale) if !hits.is_empty() => log_partition(&state.entries, &query, scale),
            _ => 0.0,
        };

        Ok(hits
            .into_iter()
            .map(|h| MatchItem::new(state.entries[h.position].key.as_str(), transform.apply(h.cosine, lp)))
            .collect())
    }

    /// Writes the current contents to the backing repository.
    pub fn persist(&self) -> Result<(), ClipError> {
        let guard = self.state.write();
        let state = guard.as_ref().ok_or(ClipError::Destroyed)?;
        self.repo.flush(&state.entries)?;
        tracing::debug!(backend = %self.repo.describe(), entries = state.entries.len(), "Feature store persisted");
        Ok(())
    }

    /// Releases the store, flushing first when configured. The store is
    /// released even if the flush fails; the flush error is returned.
    pub fn destroy(&self) -> Result<(), ClipError> {
        let state = self.state.write().take().ok_or(ClipError::Destroyed)?;
        let result = if self.flush_on_destroy {
            self.repo.flush(&state.entries)
        } else {
            Ok(())
        };
        tracing::info!(backend = %self.repo.describe(), entries = state.entries.len(), "Feature store destroyed");
        result
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.read().is_none()
    }
}

impl Drop for FeatureStore {
    fn drop(&mut self) {
        if let Some(state) = self.state.get_mut().take() {
            if self.flush_on_destroy {
                if let Err(e) = self.repo.flush(&state.entries) {
                    tracing::warn!(error = %e, backend = %self.repo.describe(), "Failed to flush feature store on drop");
                }
            }
        }
    }
}
