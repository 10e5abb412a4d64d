//! Image → feature stack.

use std::sync::OnceLock;

use super::layout::ChannelMode;
use super::stack::FeatureStack;
use crate::color::{luma, Lab};
use crate::error::{ExtractError, InputError};
use crate::gradient::{sobel, Axis, GradientPolar, Order};
use crate::histogram::OrientationHistogram;
use crate::image::{PixelSource, Plane};
use crate::morphology::{max_filter, min_filter, DEFAULT_FILTER_SIZE};

/// Derivative planes are stored as `|v| / 4`.
const DERIVATIVE_SCALE: f32 = 0.25;

/// Computes feature stacks from 8-bit RGB images.
///
/// The extractor holds only immutable parameters (the precomputed Gaussian
/// voting window), so one instance can serve any number of threads.
/// [`ChannelExtractor::shared`] returns a process-wide instance that is
/// built on first use.
///
/// # Example
///
/// ```
/// use feature_channels::{ChannelExtractor, ChannelMode, ImageView};
///
/// let pixels = vec![128u8; 8 * 8 * 3];
/// let image = ImageView::new(&pixels, 8, 8, 3).unwrap();
/// let stack = ChannelExtractor::default()
///     .extract(&image, ChannelMode::Compact)
///     .unwrap();
/// assert_eq!(stack.len(), 15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelExtractor {
    histogram: OrientationHistogram,
    filter_size: usize,
}

impl Default for ChannelExtractor {
    fn default() -> Self {
        Self {
            histogram: OrientationHistogram::default(),
            filter_size: DEFAULT_FILTER_SIZE,
        }
    }
}

impl ChannelExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide extractor with default parameters.
    pub fn shared() -> &'static ChannelExtractor {
        static SHARED: OnceLock<ChannelExtractor> = OnceLock::new();
        SHARED.get_or_init(ChannelExtractor::default)
    }

    /// Reject images the extractor cannot process.
    ///
    /// The channel count is checked before the dimensions.
    pub fn validate<S: PixelSource + ?Sized>(image: &S) -> Result<(), InputError> {
        if image.channels() != 3 {
            return Err(InputError::ChannelCount {
                found: image.channels(),
            });
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(InputError::EmptyDimension {
                height: image.height(),
                width: image.width(),
            });
        }
        Ok(())
    }

    /// Compute the feature stack of `image`.
    ///
    /// The input is never modified; the result depends only on the pixel
    /// values and `mode`.
    pub fn extract<S: PixelSource + ?Sized>(
        &self,
        image: &S,
        mode: ChannelMode,
    ) -> Result<FeatureStack, ExtractError> {
        Self::validate(image)?;
        let width = image.width();
        let height = image.height();
        tracing::debug!(width, height, %mode, "extracting feature channels");

        let [l, a, b, intensity] = convert(image)?;

        let dx = sobel(&intensity, Axis::Horizontal, Order::First)?;
        let dy = sobel(&intensity, Axis::Vertical, Order::First)?;
        let polar = GradientPolar::from_derivatives(&dx, &dy)?;
        let bins = self
            .histogram
            .planes(&polar.orientation, &polar.magnitude)?;

        let planes = match mode {
            ChannelMode::Compact => {
                let lab = [l, a, b];
                let mut planes = Vec::with_capacity(mode.plane_count());
                for plane in &lab {
                    planes.push(max_filter(plane, self.filter_size)?);
                }
                planes.extend(bins);
                for plane in &lab {
                    planes.push(min_filter(plane, self.filter_size)?);
                }
                planes
            }
            ChannelMode::Full => {
                let dxx = sobel(&intensity, Axis::Horizontal, Order::Second)?;
                let dyy = sobel(&intensity, Axis::Vertical, Order::Second)?;
                let mut base = vec![
                    l,
                    a,
                    b,
                    dx.abs_scaled(DERIVATIVE_SCALE)?,
                    dy.abs_scaled(DERIVATIVE_SCALE)?,
                    dxx.abs_scaled(DERIVATIVE_SCALE)?,
                    dyy.abs_scaled(DERIVATIVE_SCALE)?,
                ];
                base.extend(bins);

                let mut planes = Vec::with_capacity(mode.plane_count());
                for plane in &base {
                    planes.push(max_filter(plane, self.filter_size)?);
                }
                for plane in &base {
                    planes.push(min_filter(plane, self.filter_size)?);
                }
                planes
            }
        };

        FeatureStack::assemble(mode, width, height, planes)
    }
}

/// Convert an RGB image into its L, a, b and luma planes.
fn convert<S: PixelSource + ?Sized>(image: &S) -> Result<[Plane; 4], ExtractError> {
    let width = image.width();
    let height = image.height();
    let mut l = Plane::zeroed(width, height)?;
    let mut a = Plane::zeroed(width, height)?;
    let mut b = Plane::zeroed(width, height)?;
    let mut intensity = Plane::zeroed(width, height)?;

    for y in 0..height {
        let src = image.row(y);
        let (l_row, a_row) = (l.row_mut(y), a.row_mut(y));
        let (b_row, i_row) = (b.row_mut(y), intensity.row_mut(y));
        for (x, px) in src.chunks_exact(3).take(width).enumerate() {
            let [lb, ab, bb] = Lab::from_srgb8(px[0], px[1], px[2]).to_bytes();
            l_row[x] = lb;
            a_row[x] = ab;
            b_row[x] = bb;
            i_row[x] = luma(px[0], px[1], px[2]);
        }
    }
    Ok([l, a, b, intensity])
}

/// Compute 15 (`full == false`) or 32 (`full == true`) feature planes with
/// the shared extractor.
pub fn extract_features<S: PixelSource + ?Sized>(
    image: &S,
    full: bool,
) -> Result<FeatureStack, ExtractError> {
    ChannelExtractor::shared().extract(image, ChannelMode::from_full(full))
}
