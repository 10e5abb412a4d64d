//! `ndarray` arrays as extractor input.

use std::borrow::Cow;

use feature_channels::PixelSource;
use ndarray::ArrayView3;

/// A `(height, width, channels)` array seen as interleaved rows.
///
/// Arrays in standard (C) layout are borrowed as they are; any other layout
/// (transposed, sliced with a step, negative strides) is copied once into a
/// packed buffer.
#[derive(Debug, Clone)]
pub struct ArrayImage<'a> {
    data: Cow<'a, [u8]>,
    height: usize,
    width: usize,
    channels: usize,
}

impl<'a> ArrayImage<'a> {
    pub fn new(view: ArrayView3<'a, u8>) -> Self {
        let (height, width, channels) = view.dim();
        let data = match view.to_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => {
                tracing::debug!(height, width, channels, "copying non-contiguous input array");
                Cow::Owned(view.iter().copied().collect())
            }
        };
        Self {
            data,
            height,
            width,
            channels,
        }
    }

    /// Whether the pixels are read in place.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }
}

impl PixelSource for ArrayImage<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn row(&self, y: usize) -> &[u8] {
        let len = self.width * self.channels;
        &self.data[y * len..(y + 1) * len]
    }
}
