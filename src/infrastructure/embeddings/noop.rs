use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::image::ImageView;

/// Placeholder when no encoder is attached. Feature-level operations still
/// work; text and image encoding fail.
pub struct NoopProvider {
    dimension: usize,
}

impl NoopProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for NoopProvider {
    async fn encode_text(&self, _text: &str) -> Result<Vec<f32>, String> {
        Err("no embedding model configured".into())
    }

    async fn encode_image(&self, _image: &ImageView<'_>) -> Result<Vec<f32>, String> {
        Err("no embedding model configured".into())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
