//! Read-only pixel sources and owned feature planes.
//!
//! The extractor is written once against [`PixelSource`]; each concrete
//! buffer representation only needs a thin adapter implementing it.
//! [`ImageView`] is the adapter for a plain interleaved byte slice.

mod plane;
mod view;

pub use plane::Plane;
pub use view::ImageView;

/// Read-only access to an interleaved 8-bit image.
///
/// Implementors must return rows of exactly `width() * channels()` samples.
/// The extractor never mutates or retains a source beyond one call.
pub trait PixelSource {
    /// Image width in pixels.
    fn width(&self) -> usize;
    /// Image height in pixels.
    fn height(&self) -> usize;
    /// Interleaved samples per pixel.
    fn channels(&self) -> usize;
    /// Samples of row `y`, `width() * channels()` long.
    fn row(&self, y: usize) -> &[u8];
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    #[inline]
    fn width(&self) -> usize {
        (**self).width()
    }
    #[inline]
    fn height(&self) -> usize {
        (**self).height()
    }
    #[inline]
    fn channels(&self) -> usize {
        (**self).channels()
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        (**self).row(y)
    }
}
