use crate::domain::error::ClipError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::image::ImageView;
use std::sync::Arc;

/// Wraps a provider so every embedding it returns is checked against the
/// store dimension and every failure surfaces as [`ClipError::Encoding`].
#[derive(Clone)]
pub struct Encoder {
    embedder: Arc<dyn EmbeddingProvider>,
    dimension: usize,
}

impl Encoder {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, dimension: usize) -> Result<Self, ClipError> {
        let provided = embedder.dimension();
        if provided != dimension {
            return Err(ClipError::InvalidArgument(format!(
                "embedding provider produces {provided}-d vectors, store dimension is {dimension}"
            )));
        }
        Ok(Self { embedder, dimension })
    }

    pub async fn text(&self, text: &str) -> Result<Vec<f32>, ClipError> {
        if text.trim().is_empty() {
            return Err(ClipError::Encoding("empty text".into()));
        }
        let v = self.embedder.encode_text(text).await.map_err(ClipError::Encoding)?;
        self.check(v)
    }

    pub async fn image(&self, image: &ImageView<'_>) -> Result<Vec<f32>, ClipError> {
        image.validate()?;
        let v = self.embedder.encode_image(image).await.map_err(ClipError::Encoding)?;
        self.check(v)
    }

    fn check(&self, v: Vec<f32>) -> Result<Vec<f32>, ClipError> {
        if v.len() != self.dimension {
            return Err(ClipError::Encoding(format!(
                "encoder returned {} components, expected {}",
                v.len(),
                self.dimension
            )));
        }
        Ok(v)
    }
}
