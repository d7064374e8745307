pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

use crate::application::add_image::AddImageUseCase;
use crate::application::encoding::Encoder;
use crate::application::matching::MatchUseCase;
use crate::application::session::Session;
use crate::application::store::{FeatureStore, StoreOptions};
use crate::config::{StorageBackend, StoreConfig};
use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::entities::match_item::MatchItem;
use crate::domain::error::ClipError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::feature_repository::FeatureRepository;
use crate::domain::values::image::ImageView;
use crate::infrastructure::memory::MemoryRepo;
use crate::infrastructure::snapshot::file_repo::SnapshotRepo;
use crate::infrastructure::sqlite::feature_repo::SqliteFeatureRepo;
use parking_lot::Mutex;
use std::sync::Arc;

/// A feature database bound to an open device session and an encoder.
///
/// Dropping or destroying a `ClipStore` releases its hold on the session;
/// the device is deinitialized once every store and the session itself are gone.
pub struct ClipStore {
    store: Arc<FeatureStore>,
    add_image_uc: AddImageUseCase,
    match_uc: MatchUseCase,
    session: Mutex<Option<Session>>,
}

impl ClipStore {
    pub fn create(
        session: &Session,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &StoreConfig,
    ) -> Result<Self, ClipError> {
        config.validate()?;
        if session.device() != config.device {
            return Err(ClipError::InvalidArgument(format!(
                "session is open on {}, config selects {}",
                session.device(),
                config.device
            )));
        }

        let encoder = Encoder::new(embedder, config.dimension)?;
        let repo = open_repository(config)?;
        let options = StoreOptions::new(config.dimension)
            .with_index(config.index.build())
            .flush_on_destroy(config.flush_on_destroy);
        let store = Arc::new(FeatureStore::open(repo, options)?);

        Ok(Self {
            add_image_uc: AddImageUseCase::new(store.clone(), encoder.clone()),
            match_uc: MatchUseCase::new(store.clone(), encoder, config.model_family),
            store,
            session: Mutex::new(Some(session.clone())),
        })
    }

    pub fn store(&self) -> &Arc<FeatureStore> {
        &self.store
    }

    pub fn dimension(&self) -> usize {
        self.store.dimension()
    }

    // Delegating methods
    pub async fn add_image(&self, key: &str, image: &ImageView<'_>) -> Result<bool, ClipError> {
        self.add_image_uc.execute(key, image, false).await
    }

    pub async fn add_image_overwrite(&self, key: &str, image: &ImageView<'_>) -> Result<bool, ClipError> {
        self.add_image_uc.execute(key, image, true).await
    }

    pub fn add_feature(&self, key: &str, feature: Vec<f32>) -> Result<bool, ClipError> {
        self.store.insert(key, feature)
    }

    pub fn upsert_feature(&self, key: &str, feature: Vec<f32>) -> Result<bool, ClipError> {
        self.store.upsert(key, feature)
    }

    pub fn remove(&self, key: &str) -> Result<bool, ClipError> {
        self.store.remove(key)
    }

    pub fn contains(&self, key: &str) -> Result<bool, ClipError> {
        self.store.contains(key)
    }

    pub fn size(&self) -> Result<usize, ClipError> {
        self.store.size()
    }

    pub fn keys(&self) -> Result<Vec<String>, ClipError> {
        self.store.keys()
    }

    pub fn entries(&self) -> Result<Vec<FeatureEntry>, ClipError> {
        self.store.entries()
    }

    /// Stored feature of `key`; a missing key is [`ClipError::NotFound`].
    pub fn feature_of(&self, key: &str) -> Result<Vec<f32>, ClipError> {
        self.store
            .get(key)?
            .ok_or_else(|| ClipError::NotFound(format!("key {key}")))
    }

    pub async fn text_feature(&self, text: &str) -> Result<Vec<f32>, ClipError> {
        self.match_uc.text_feature(text).await
    }

    pub async fn image_feature(&self, image: &ImageView<'_>) -> Result<Vec<f32>, ClipError> {
        self.match_uc.image_feature(image).await
    }

    pub async fn match_text(&self, text: &str, top_k: usize) -> Result<Vec<MatchItem>, ClipError> {
        self.match_uc.match_text(text, top_k).await
    }

    pub async fn match_image(&self, image: &ImageView<'_>, top_k: usize) -> Result<Vec<MatchItem>, ClipError> {
        self.match_uc.match_image(image, top_k).await
    }

    pub fn match_feature(&self, feature: &[f32], top_k: usize) -> Result<Vec<MatchItem>, ClipError> {
        self.match_uc.match_feature(feature, top_k)
    }

    pub fn persist(&self) -> Result<(), ClipError> {
        self.store.persist()
    }

    /// Releases the store and its session hold. Later calls fail with [`ClipError::Destroyed`].
    pub fn destroy(&self) -> Result<(), ClipError> {
        let result = self.store.destroy();
        self.session.lock().take();
        result
    }
}

/// Backing repository for `config`: memory without a path, otherwise the configured backend.
pub fn open_repository(config: &StoreConfig) -> Result<Arc<dyn FeatureRepository>, ClipError> {
    let repo: Arc<dyn FeatureRepository> = match (config.effective_backend(), &config.db_path) {
        (StorageBackend::Snapshot, Some(path)) => Arc::new(SnapshotRepo::new(path.clone(), config.dimension)),
        (StorageBackend::Sqlite, Some(path)) => {
            let path = path
                .to_str()
                .ok_or_else(|| ClipError::Config(format!("non UTF-8 db path {}", path.display())))?;
            Arc::new(SqliteFeatureRepo::open(path, config.dimension)?)
        }
        _ => Arc::new(MemoryRepo),
    };
    Ok(repo)
}
