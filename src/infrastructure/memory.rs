use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::error::ClipError;
use crate::domain::ports::feature_repository::FeatureRepository;
use crate::domain::values::feature_key::FeatureKey;

/// No backing storage: loads empty, every write is a no-op.
pub struct MemoryRepo;

impl FeatureRepository for MemoryRepo {
    fn load(&self) -> Result<Vec<FeatureEntry>, ClipError> {
        Ok(vec![])
    }

    fn put(&self, _entry: &FeatureEntry) -> Result<(), ClipError> {
        Ok(())
    }

    fn delete(&self, _key: &FeatureKey) -> Result<(), ClipError> {
        Ok(())
    }

    fn flush(&self, _entries: &[FeatureEntry]) -> Result<(), ClipError> {
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
