//! Typed-array front end for the extractor.

use std::sync::Arc;

use feature_channels::{ChannelExtractor, ChannelMode, ExtractError, InputError};
use ndarray::{Array3, ArrayView3, ArrayViewD, Ix3};

use crate::array_view::ArrayImage;
use crate::error::AdapterError;
use crate::lock::{CoordinationLock, ReleasedRegion, Uncoordinated};

/// Marshals `(H, W, 3)` `u8` arrays into the extractor and returns a
/// `(N, H, W)` `u8` array, N being 15 or 32.
///
/// The configured [`CoordinationLock`] is released while features are
/// computed and reacquired before `run` returns.
#[derive(Clone)]
pub struct BufferAdapter {
    lock: Arc<dyn CoordinationLock>,
    extractor: &'static ChannelExtractor,
}

impl Default for BufferAdapter {
    fn default() -> Self {
        Self::new(Arc::new(Uncoordinated))
    }
}

impl std::fmt::Debug for BufferAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferAdapter").finish_non_exhaustive()
    }
}

impl BufferAdapter {
    pub fn new(lock: Arc<dyn CoordinationLock>) -> Self {
        Self {
            lock,
            extractor: ChannelExtractor::shared(),
        }
    }

    /// Compute the feature planes of `input`.
    ///
    /// `input` must have exactly three dimensions with a last axis of
    /// length 3. Shape errors are reported before the lock is released.
    pub fn run(&self, input: ArrayViewD<'_, u8>, full: bool) -> Result<Array3<u8>, AdapterError> {
        let shape = input.shape().to_vec();
        if shape.len() != 3 || shape[2] != 3 {
            return Err(AdapterError::InvalidShape { shape });
        }
        let image = input
            .into_dimensionality::<Ix3>()
            .map_err(|_| AdapterError::InvalidShape { shape })?;
        self.run_image(image, full)
    }

    /// [`run`](Self::run) for an input already known to be three-dimensional.
    ///
    /// Non-contiguous inputs are packed inside the released region.
    pub fn run_image(
        &self,
        input: ArrayView3<'_, u8>,
        full: bool,
    ) -> Result<Array3<u8>, AdapterError> {
        let (height, width, channels) = input.dim();
        if channels != 3 {
            return Err(AdapterError::InvalidShape {
                shape: vec![height, width, channels],
            });
        }
        if height == 0 || width == 0 {
            return Err(ExtractError::from(InputError::EmptyDimension { height, width }).into());
        }

        let mode = ChannelMode::from_full(full);
        let planes = mode.plane_count();
        let plane_len = height * width;
        let bytes = planes.saturating_mul(plane_len);
        let mut out = Vec::new();
        out.try_reserve_exact(bytes)
            .map_err(|_| AdapterError::AllocationFailure { bytes })?;
        out.resize(bytes, 0u8);

        let stack = {
            let _released = ReleasedRegion::enter(self.lock.as_ref());
            let image = ArrayImage::new(input);
            self.extractor.extract(&image, mode)?
        };

        for (dst, plane) in out.chunks_exact_mut(plane_len).zip(stack.planes()) {
            dst.copy_from_slice(plane.as_slice());
        }
        tracing::debug!(height, width, planes, "feature planes ready");

        Array3::from_shape_vec((planes, height, width), out)
            .map_err(|e| ExtractError::InternalNumericFailure(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_shape() {
        let input = Array3::<u8>::from_elem((6, 9, 3), 77);
        let adapter = BufferAdapter::default();
        let compact = adapter.run(input.view().into_dyn(), false).unwrap();
        assert_eq!(compact.shape(), &[15, 6, 9]);
        let full = adapter.run(input.view().into_dyn(), true).unwrap();
        assert_eq!(full.shape(), &[32, 6, 9]);
    }

    #[test]
    fn test_rejects_wrong_rank() {
        let input = Array::<u8, _>::zeros(IxDyn(&[4, 4]));
        let error = BufferAdapter::default().run(input.view(), false).unwrap_err();
        match error {
            AdapterError::InvalidShape { shape } => assert_eq!(shape, vec![4, 4]),
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_four_channels() {
        let input = Array::<u8, _>::zeros(IxDyn(&[4, 4, 4]));
        let error = BufferAdapter::default().run(input.view(), true).unwrap_err();
        assert!(matches!(error, AdapterError::InvalidShape { .. }));
    }

    #[test]
    fn test_rejects_empty_image() {
        let input = Array3::<u8>::zeros((0, 4, 3));
        let error = BufferAdapter::default()
            .run_image(input.view(), false)
            .unwrap_err();
        assert!(matches!(
            error,
            AdapterError::Extract(ExtractError::InvalidInput(InputError::EmptyDimension {
                height: 0,
                width: 4
            }))
        ));
    }

    #[test]
    fn test_planes_match_extractor() {
        let input = Array3::from_shape_fn((8, 7, 3), |(y, x, c)| (y * 31 + x * 17 + c * 5) as u8);
        let out = BufferAdapter::default().run_image(input.view(), true).unwrap();
        let slice = input.as_slice().unwrap();
        let view = feature_channels::ImageView::new(slice, 7, 8, 3).unwrap();
        let stack = feature_channels::extract_features(&view, true).unwrap();
        for (i, plane) in stack.iter().enumerate() {
            assert_eq!(
                out.index_axis(ndarray::Axis(0), i).as_slice().unwrap(),
                plane.as_slice()
            );
        }
    }
}
