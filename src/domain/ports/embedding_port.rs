use crate::domain::values::image::ImageView;

/// Opaque text/image encoder. Implementations return one embedding of
/// `dimension()` components per call; errors are surfaced as encoding failures.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn encode_text(&self, text: &str) -> Result<Vec<f32>, String>;
    async fn encode_image(&self, image: &ImageView<'_>) -> Result<Vec<f32>, String>;
    fn dimension(&self) -> usize;
}
