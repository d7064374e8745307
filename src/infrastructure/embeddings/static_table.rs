use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::image::ImageView;
use std::collections::HashMap;

/// Lookup-table provider: texts map to fixed vectors and images map by a
/// checksum of their pixels. Useful for demos and for replaying embeddings
/// computed elsewhere.
#[derive(Default)]
pub struct StaticTableProvider {
    dimension: usize,
    texts: HashMap<String, Vec<f32>>,
    images: HashMap<u32, Vec<f32>>,
}

impl StaticTableProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension, ..Default::default() }
    }

    pub fn with_text(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.texts.insert(text.to_string(), vector);
        self
    }

    pub fn with_image(mut self, image: &ImageView<'_>, vector: Vec<f32>) -> Self {
        self.images.insert(image_digest(image), vector);
        self
    }
}

/// Checksum over geometry and visible pixels; stride padding is ignored.
fn image_digest(image: &ImageView<'_>) -> u32 {
    let mut h = crc32fast::Hasher::new();
    h.update(&(image.width as u64).to_le_bytes());
    h.update(&(image.height as u64).to_le_bytes());
    h.update(&(image.channels as u64).to_le_bytes());
    for y in 0..image.height {
        h.update(image.row(y));
    }
    h.finalize()
}

#[async_trait::async_trait]
impl EmbeddingProvider for StaticTableProvider {
    async fn encode_text(&self, text: &str) -> Result<Vec<f32>, String> {
        self.texts
            .get(text)
            .cloned()
            .ok_or_else(|| format!("no embedding registered for text '{text}'"))
    }

    async fn encode_image(&self, image: &ImageView<'_>) -> Result<Vec<f32>, String> {
        image.validate().map_err(|e| e.to_string())?;
        self.images
            .get(&image_digest(image))
            .cloned()
            .ok_or_else(|| format!("no embedding registered for {}x{} image", image.width, image.height))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn padding_does_not_change_lookup() {
        let packed = [1u8, 2, 3, 4, 5, 6];
        let padded = [1u8, 2, 3, 0, 4, 5, 6, 0];
        let p = StaticTableProvider::new(2).with_image(&ImageView::packed(&packed, 1, 2, 3), vec![1.0, 0.0]);
        let view = ImageView { data: &padded, width: 1, height: 2, channels: 3, stride: 4 };
        assert_eq!(p.encode_image(&view).await.unwrap(), vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn unknown_text_is_an_error() {
        let p = StaticTableProvider::new(2).with_text("dog", vec![0.0, 1.0]);
        assert!(p.encode_text("dog").await.is_ok());
        assert!(p.encode_text("cat").await.is_err());
    }
}
