use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::error::ClipError;
use crate::domain::values::feature_key::FeatureKey;

/// Backing storage for a feature store.
///
/// Write-through repositories commit in `put`/`delete`; snapshot repositories
/// ignore those and rewrite everything in `flush`.
pub trait FeatureRepository: Send + Sync {
    /// Entries in insertion order.
    fn load(&self) -> Result<Vec<FeatureEntry>, ClipError>;
    fn put(&self, entry: &FeatureEntry) -> Result<(), ClipError>;
    fn delete(&self, key: &FeatureKey) -> Result<(), ClipError>;
    fn flush(&self, entries: &[FeatureEntry]) -> Result<(), ClipError>;
    fn describe(&self) -> String;
}
