//! Orientation histogram planes ("HOG-like" channels).
//!
//! Every pixel whose `window × window` neighbourhood fits inside the image
//! receives a histogram of the gradient orientations in that neighbourhood.
//! Each neighbour votes with its gradient magnitude, weighted by a
//! normalised Gaussian centred on the window, and its vote is split
//! linearly between the two nearest bins (the bins wrap around, since
//! orientation is π-periodic). Bin `k` of every histogram is materialised
//! as plane `k`.
//!
//! ```text
//!  orientation O (0..=251)     v = O / bin_size      bin_size = 80π / bins
//!
//!  |----b0----|----b1----| ... |----b8----|
//!        ^ v = 0.7: 80% to b0, 20% to b1
//! ```
//!
//! Border pixels whose window does not fit stay 0.

mod gaussian;

use std::f64::consts::PI;

use crate::error::ExtractError;
use crate::gradient::ORIENTATION_SCALE;
use crate::image::Plane;

pub use gaussian::gaussian_window;

/// Default number of orientation bins.
pub const DEFAULT_BINS: usize = 9;
/// Default side length of the voting window.
pub const DEFAULT_WINDOW: usize = 5;

/// Immutable histogram parameters with the precomputed Gaussian window.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationHistogram {
    bins: usize,
    window: usize,
    bin_size: f32,
    weights: Vec<f32>,
}

impl Default for OrientationHistogram {
    fn default() -> Self {
        Self::new(DEFAULT_BINS, DEFAULT_WINDOW)
    }
}

impl OrientationHistogram {
    /// Create a histogram with `bins` bins over `[0, π)` and a square
    /// `window`.
    ///
    /// # Panics
    ///
    /// Panics if `bins < 2` or `window` is not odd.
    pub fn new(bins: usize, window: usize) -> Self {
        assert!(bins >= 2, "at least two orientation bins are required");
        assert!(window % 2 == 1, "the voting window must have odd size");
        Self {
            bins,
            window,
            bin_size: (PI * ORIENTATION_SCALE as f64 / bins as f64) as f32,
            weights: gaussian_window(window),
        }
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Compute one plane per bin from an orientation plane and a magnitude
    /// plane of the same shape.
    pub fn planes(
        &self,
        orientation: &Plane,
        magnitude: &Plane,
    ) -> Result<Vec<Plane>, ExtractError> {
        let w = orientation.width();
        let h = orientation.height();
        if magnitude.width() != w || magnitude.height() != h {
            return Err(ExtractError::InternalNumericFailure(format!(
                "orientation is {}x{} but magnitude is {}x{}",
                h,
                w,
                magnitude.height(),
                magnitude.width()
            )));
        }

        let mut out = Vec::with_capacity(self.bins);
        for _ in 0..self.bins {
            out.push(Plane::zeroed(w, h)?);
        }
        if w < self.window || h < self.window {
            tracing::trace!(width = w, height = h, "image smaller than histogram window");
            return Ok(out);
        }

        // Bin position of every pixel, computed once instead of per window
        let positions: Vec<f32> = orientation
            .as_slice()
            .iter()
            .map(|&o| o as f32 / self.bin_size)
            .collect();

        let half = self.window / 2;
        let mut desc = vec![0.0f64; self.bins];
        for top in 0..=h - self.window {
            for left in 0..=w - self.window {
                self.accumulate(&positions, magnitude, left, top, &mut desc);
                for (bin, plane) in out.iter_mut().enumerate() {
                    plane.row_mut(top + half)[left + half] = to_byte(desc[bin])?;
                }
            }
        }
        Ok(out)
    }

    /// Histogram of the window whose top-left corner is `(left, top)`.
    fn accumulate(
        &self,
        positions: &[f32],
        magnitude: &Plane,
        left: usize,
        top: usize,
        desc: &mut [f64],
    ) {
        desc.fill(0.0);
        let w = magnitude.width();
        let rows = self.weights.chunks_exact(self.window).zip(top..);
        for (row_weights, y) in rows {
            let mags = &magnitude.row(y)[left..left + self.window];
            let pos = &positions[y * w + left..y * w + left + self.window];
            for ((&m, &v), &g) in mags.iter().zip(pos).zip(row_weights) {
                soft_assign(v, m as f32 * g, desc);
            }
        }
    }
}

/// Split weight `w` between the bin containing `position` and its nearest
/// neighbour, proportionally to the distance from the bin centre.
#[inline]
pub(crate) fn soft_assign(position: f32, w: f32, desc: &mut [f64]) {
    let count = desc.len();
    let lower = (position as usize).min(count - 1);
    let mut delta = position - lower as f32 - 0.5;
    let neighbour = if delta < 0.0 {
        delta = -delta;
        if lower < 1 {
            count - 1
        } else {
            lower - 1
        }
    } else if lower < count - 1 {
        lower + 1
    } else {
        0
    };
    desc[lower] += ((1.0 - delta) * w) as f64;
    desc[neighbour] += (delta * w) as f64;
}

#[inline]
fn to_byte(value: f64) -> Result<u8, ExtractError> {
    if !value.is_finite() {
        return Err(ExtractError::InternalNumericFailure(format!(
            "orientation histogram accumulated {value}"
        )));
    }
    Ok(value.clamp(0.0, 255.0) as u8)
}
