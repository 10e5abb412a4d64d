//! Zero-copy view over an interleaved byte slice.

use super::PixelSource;
use crate::error::InputError;

/// A borrowed interleaved image: `height` rows of `width * channels`
/// samples, consecutive rows `stride` bytes apart.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// View a tightly packed buffer (`stride == width * channels`).
    ///
    /// Only the buffer length is checked here; channel count and empty
    /// dimensions are rejected by the extractor so that every view of a
    /// well-formed buffer can be constructed.
    ///
    /// # Example
    ///
    /// ```
    /// use feature_channels::{ImageView, PixelSource};
    ///
    /// let pixels = [0u8; 2 * 3 * 3];
    /// let view = ImageView::new(&pixels, 3, 2, 3).unwrap();
    /// assert_eq!(view.row(1).len(), 9);
    /// ```
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self, InputError> {
        Self::with_stride(data, width, height, channels, width.saturating_mul(channels))
    }

    /// View a buffer whose rows are `stride` bytes apart.
    pub fn with_stride(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> Result<Self, InputError> {
        let row_len = width.saturating_mul(channels);
        if stride < row_len {
            return Err(InputError::StrideTooSmall { stride, row_len });
        }
        let expected = match height {
            0 => 0,
            h => stride.saturating_mul(h - 1).saturating_add(row_len),
        };
        if data.len() < expected {
            return Err(InputError::BufferTooShort {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    /// Bytes between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Samples of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = x * self.channels;
        &self.row(y)[start..start + self.channels]
    }
}

impl PixelSource for ImageView<'_> {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * self.channels]
    }
}
