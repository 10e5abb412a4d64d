//! The extractor's output.

use super::layout::{ChannelMode, PlaneId};
use crate::error::{try_zeroed, ExtractError};
use crate::image::Plane;

/// An ordered stack of equally sized feature planes.
///
/// The plane order is the one given by [`ChannelMode::layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureStack {
    mode: ChannelMode,
    width: usize,
    height: usize,
    planes: Vec<Plane>,
}

impl FeatureStack {
    /// Wrap `planes` after checking count and shape against `mode`.
    pub fn assemble(
        mode: ChannelMode,
        width: usize,
        height: usize,
        planes: Vec<Plane>,
    ) -> Result<Self, ExtractError> {
        if planes.len() != mode.plane_count() {
            return Err(ExtractError::InternalNumericFailure(format!(
                "{mode} stack needs {} planes, got {}",
                mode.plane_count(),
                planes.len()
            )));
        }
        if let Some((index, plane)) = planes
            .iter()
            .enumerate()
            .find(|(_, p)| p.width() != width || p.height() != height)
        {
            return Err(ExtractError::InternalNumericFailure(format!(
                "plane {index} is {}x{}, expected {height}x{width}",
                plane.height(),
                plane.width()
            )));
        }
        Ok(Self {
            mode,
            width,
            height,
            planes,
        })
    }

    #[inline]
    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of planes (15 or 32).
    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Plane `index`, or `None` past the end.
    #[inline]
    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.planes.get(index)
    }

    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Plane> {
        self.planes.iter()
    }

    /// Identity of each plane, in order.
    pub fn plane_ids(&self) -> Vec<PlaneId> {
        self.mode.layout()
    }

    pub fn into_planes(self) -> Vec<Plane> {
        self.planes
    }

    /// Concatenate all planes into one plane-major buffer of
    /// `len() * height * width` bytes.
    pub fn into_contiguous(self) -> Result<Vec<u8>, ExtractError> {
        let plane_len = self.width * self.height;
        let mut out: Vec<u8> = try_zeroed(plane_len * self.planes.len())?;
        for (dst, plane) in out.chunks_exact_mut(plane_len.max(1)).zip(&self.planes) {
            dst.copy_from_slice(plane.as_slice());
        }
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a FeatureStack {
    type Item = &'a Plane;
    type IntoIter = std::slice::Iter<'a, Plane>;

    fn into_iter(self) -> Self::IntoIter {
        self.planes.iter()
    }
}
