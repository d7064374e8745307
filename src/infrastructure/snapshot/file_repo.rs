use super::codec;
use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::error::ClipError;
use crate::domain::ports::feature_repository::FeatureRepository;
use crate::domain::values::feature_key::FeatureKey;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Whole-store snapshot in a single file.
///
/// `flush` writes a sibling temp file, fsyncs it and renames it over the
/// target, so a crash mid-write leaves the previous snapshot intact.
pub struct SnapshotRepo {
    path: PathBuf,
    dimension: usize,
}

impl SnapshotRepo {
    pub fn new(path: impl Into<PathBuf>, dimension: usize) -> Self {
        Self { path: path.into(), dimension }
    }
}

impl FeatureRepository for SnapshotRepo {
    fn load(&self) -> Result<Vec<FeatureEntry>, ClipError> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "No snapshot yet, starting empty");
            return Ok(vec![]);
        }
        let bytes = std::fs::read(&self.path)
            .map_err(|e| ClipError::Storage(format!("read {}: {e}", self.path.display())))?;
        codec::decode(&bytes, self.dimension)
    }

    fn put(&self, _entry: &FeatureEntry) -> Result<(), ClipError> {
        Ok(())
    }

    fn delete(&self, _key: &FeatureKey) -> Result<(), ClipError> {
        Ok(())
    }

    fn flush(&self, entries: &[FeatureEntry]) -> Result<(), ClipError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut w = BufWriter::new(tmp.as_file());
            codec::encode(&mut w, self.dimension, entries)?;
            w.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| ClipError::Storage(format!("rename onto {}: {}", self.path.display(), e.error)))?;

        tracing::debug!(path = ?self.path, entries = entries.len(), "Snapshot written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("snapshot:{}", self.path.display())
    }
}
