use crate::application::ranker::LinearScan;
use crate::domain::error::ClipError;
use crate::domain::ports::similarity_index::SimilarityIndex;
use crate::domain::values::device::DeviceSelector;
use crate::domain::values::score::ModelFamily;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the TOML config file read by the CLI.
pub const CONFIG_ENV: &str = "CLIPSTORE_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Snapshot,
    Sqlite,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Snapshot => write!(f, "snapshot"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "snapshot" => Ok(StorageBackend::Snapshot),
            "sqlite" => Ok(StorageBackend::Sqlite),
            _ => Err(format!("Unknown storage backend: {s}")),
        }
    }
}

/// Nearest-neighbor strategy. Only the exhaustive scan ships; an approximate
/// index plugs in here behind [`SimilarityIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    #[default]
    Linear,
}

impl IndexKind {
    pub fn build(&self) -> Box<dyn SimilarityIndex> {
        match self {
            IndexKind::Linear => Box::new(LinearScan),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Without a path the store lives in memory whatever `backend` says.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default)]
    pub index: IndexKind,

    #[serde(default)]
    pub model_family: ModelFamily,

    #[serde(default = "default_flush_on_destroy")]
    pub flush_on_destroy: bool,

    #[serde(default)]
    pub device: DeviceSelector,
}

fn default_dimension() -> usize {
    512
}

fn default_flush_on_destroy() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            db_path: None,
            backend: StorageBackend::default(),
            index: IndexKind::default(),
            model_family: ModelFamily::default(),
            flush_on_destroy: default_flush_on_destroy(),
            device: DeviceSelector::default(),
        }
    }
}

impl StoreConfig {
    pub fn in_memory(dimension: usize) -> Self {
        Self { dimension, backend: StorageBackend::Memory, ..Default::default() }
    }

    pub fn persisted(dimension: usize, backend: StorageBackend, path: impl Into<PathBuf>) -> Self {
        Self {
            dimension,
            backend,
            db_path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn parse(text: &str) -> Result<Self, ClipError> {
        let config: StoreConfig = toml::from_str(text).map_err(|e| ClipError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ClipError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClipError::Config(format!("read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    /// Reads the file named by `CLIPSTORE_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ClipError> {
        match std::env::var(CONFIG_ENV) {
            Ok(p) => Self::load(Path::new(&p)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ClipError> {
        if self.dimension == 0 {
            return Err(ClipError::Config("dimension must be positive".into()));
        }
        Ok(())
    }

    /// The backend actually used: memory when no path is configured.
    pub fn effective_backend(&self) -> StorageBackend {
        match self.db_path {
            None => StorageBackend::Memory,
            Some(_) => self.backend,
        }
    }
}
