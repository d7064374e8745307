use crate::application::encoding::Encoder;
use crate::application::store::FeatureStore;
use crate::domain::entities::match_item::MatchItem;
use crate::domain::error::ClipError;
use crate::domain::values::image::ImageView;
use crate::domain::values::score::{ModelFamily, QueryKind, ScoreTransform};
use std::sync::Arc;

pub struct MatchUseCase {
    store: Arc<FeatureStore>,
    encoder: Encoder,
    family: ModelFamily,
}

impl MatchUseCase {
    pub fn new(store: Arc<FeatureStore>, encoder: Encoder, family: ModelFamily) -> Self {
        Self { store, encoder, family }
    }

    fn transform(&self, kind: QueryKind) -> ScoreTransform {
        ScoreTransform::for_query(self.family, kind)
    }

    pub async fn text_feature(&self, text: &str) -> Result<Vec<f32>, ClipError> {
        self.encoder.text(text).await
    }

    pub async fn image_feature(&self, image: &ImageView<'_>) -> Result<Vec<f32>, ClipError> {
        self.encoder.image(image).await
    }

    /// Text-to-image match. Scores follow the model family's calibration.
    pub async fn match_text(&self, text: &str, top_k: usize) -> Result<Vec<MatchItem>, ClipError> {
        if top_k == 0 {
            return Err(ClipError::InvalidArgument("top_k must be positive".into()));
        }
        let feature = self.encoder.text(text).await?;
        self.store.query_with(&feature, top_k, self.transform(QueryKind::Text))
    }

    /// Image-to-image match. Scores are cosine clamped to [0, 1].
    pub async fn match_image(&self, image: &ImageView<'_>, top_k: usize) -> Result<Vec<MatchItem>, ClipError> {
        if top_k == 0 {
            return Err(ClipError::InvalidArgument("top_k must be positive".into()));
        }
        let feature = self.encoder.image(image).await?;
        self.store.query_with(&feature, top_k, self.transform(QueryKind::Image))
    }

    /// Match a precomputed feature. Scores are plain cosine.
    pub fn match_feature(&self, feature: &[f32], top_k: usize) -> Result<Vec<MatchItem>, ClipError> {
        self.store.query_with(feature, top_k, self.transform(QueryKind::Feature))
    }
}
