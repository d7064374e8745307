use crate::application::encoding::Encoder;
use crate::application::store::FeatureStore;
use crate::domain::error::ClipError;
use crate::domain::values::feature_key::FeatureKey;
use crate::domain::values::image::ImageView;
use std::sync::Arc;

pub struct AddImageUseCase {
    store: Arc<FeatureStore>,
    encoder: Encoder,
}

impl AddImageUseCase {
    pub fn new(store: Arc<FeatureStore>, encoder: Encoder) -> Self {
        Self { store, encoder }
    }

    /// Encodes `image` and stores it under `key`.
    ///
    /// Without `overwrite` an existing key is left alone and the image is not
    /// encoded at all. Returns `true` if the key was new.
    pub async fn execute(&self, key: &str, image: &ImageView<'_>, overwrite: bool) -> Result<bool, ClipError> {
        let key = FeatureKey::new(key)?;
        if !overwrite && self.store.contains(key.as_str())? {
            tracing::debug!(key = %key, "Image already indexed, skipping encode");
            return Ok(false);
        }

        let vector = self.encoder.image(image).await?;
        if overwrite {
            self.store.upsert(key.as_str(), vector)
        } else {
            self.store.insert(key.as_str(), vector)
        }
    }
}
