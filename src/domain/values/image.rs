use crate::domain::error::ClipError;

/// Borrowed interleaved pixel buffer (row-major, `stride` bytes per row).
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub stride: usize,
}

impl<'a> ImageView<'a> {
    /// Tightly packed buffer: stride is `width * channels`.
    pub fn packed(data: &'a [u8], width: usize, height: usize, channels: usize) -> Self {
        Self { data, width, height, channels, stride: width.saturating_mul(channels) }
    }

    fn overflow() -> ClipError {
        ClipError::Encoding("image dimensions overflow".into())
    }

    pub fn validate(&self) -> Result<(), ClipError> {
        if self.width == 0 || self.height == 0 || self.channels == 0 {
            return Err(ClipError::Encoding(format!(
                "zero-size image {}x{}x{}",
                self.width, self.height, self.channels
            )));
        }
        let row = self.width.checked_mul(self.channels).ok_or_else(Self::overflow)?;
        if self.stride < row {
            return Err(ClipError::Encoding(format!(
                "stride {} shorter than row of {row} bytes",
                self.stride
            )));
        }
        let needed = self
            .stride
            .checked_mul(self.height - 1)
            .and_then(|n| n.checked_add(row))
            .ok_or_else(Self::overflow)?;
        if self.data.len() < needed {
            return Err(ClipError::Encoding(format!(
                "pixel buffer has {} bytes, image needs {needed}",
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Pixel bytes of row `y`, without stride padding.
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * self.channels]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_rgb_is_valid() {
        let px = vec![0u8; 4 * 3 * 3];
        assert!(ImageView::packed(&px, 4, 3, 3).validate().is_ok());
    }

    #[test]
    fn zero_size_is_encoding_error() {
        let err = ImageView::packed(&[], 0, 10, 3).validate().unwrap_err();
        assert!(matches!(err, ClipError::Encoding(_)));
    }

    #[test]
    fn padded_last_row_may_be_short() {
        // 2x2 RGB, stride 8: last row only needs 6 bytes
        let px = vec![7u8; 8 + 6];
        let img = ImageView { data: &px, width: 2, height: 2, channels: 3, stride: 8 };
        assert!(img.validate().is_ok());
        assert_eq!(img.row(1).len(), 6);
    }

    #[test]
    fn overflowing_sizes_are_encoding_errors() {
        let px = vec![0u8; 16];
        let wide = ImageView { data: &px, width: usize::MAX, height: 2, channels: 3, stride: 4 };
        assert!(matches!(wide.validate(), Err(ClipError::Encoding(_))));

        let tall = ImageView { data: &px, width: 1, height: usize::MAX, channels: 3, stride: 3 };
        assert!(matches!(tall.validate(), Err(ClipError::Encoding(_))));

        let packed = ImageView::packed(&px, usize::MAX, 2, 3);
        assert!(matches!(packed.validate(), Err(ClipError::Encoding(_))));
    }

    #[test]
    fn short_buffer_is_rejected() {
        let px = vec![0u8; 10];
        assert!(ImageView::packed(&px, 2, 2, 3).validate().is_err());
    }
}
