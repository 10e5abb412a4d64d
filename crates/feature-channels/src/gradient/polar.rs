//! Gradient magnitude and orientation planes.

use std::f32::consts::FRAC_PI_2;

use super::sobel::DerivativeMap;
use crate::error::ExtractError;
use crate::image::Plane;

/// Orientation steps per radian. Maps `[0, π)` onto `0..=251`.
pub const ORIENTATION_SCALE: f32 = 80.0;

/// Keeps `gy / gx` finite when `gx == 0` while preserving its sign.
const DIVISION_GUARD: f32 = 0.000001;

/// Per-pixel gradient magnitude and unsigned orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientPolar {
    /// `sqrt(gx² + gy²)`, truncated and saturated to 255.
    pub magnitude: Plane,
    /// `(atan(gy / gx) + π/2) * 80`, truncated.
    pub orientation: Plane,
}

impl GradientPolar {
    /// Build both planes from a first-order derivative pair.
    pub fn from_derivatives(dx: &DerivativeMap, dy: &DerivativeMap) -> Result<Self, ExtractError> {
        if dx.width() != dy.width() || dx.height() != dy.height() {
            return Err(ExtractError::InternalNumericFailure(format!(
                "derivative shapes differ: {}x{} vs {}x{}",
                dx.height(),
                dx.width(),
                dy.height(),
                dy.width()
            )));
        }
        let mut magnitude = Plane::zeroed(dx.width(), dx.height())?;
        let mut orientation = Plane::zeroed(dx.width(), dx.height())?;

        let pairs = dx.as_slice().iter().zip(dy.as_slice());
        let outputs = magnitude
            .as_mut_slice()
            .iter_mut()
            .zip(orientation.as_mut_slice().iter_mut());
        for ((&gx, &gy), (mag, ori)) in pairs.zip(outputs) {
            *mag = saturated_magnitude(gx, gy);
            *ori = quantized_orientation(gx, gy);
        }

        Ok(Self {
            magnitude,
            orientation,
        })
    }
}

/// Euclidean norm clamped to the 8-bit range.
#[inline]
pub(crate) fn saturated_magnitude(gx: i16, gy: i16) -> u8 {
    let sq = gx as i32 * gx as i32 + gy as i32 * gy as i32;
    (sq as f32).sqrt().min(255.0) as u8
}

/// π-periodic angle of `(gx, gy)` scaled by [`ORIENTATION_SCALE`].
#[inline]
pub(crate) fn quantized_orientation(gx: i16, gy: i16) -> u8 {
    let gx = gx as f32;
    let tx = gx + DIVISION_GUARD.copysign(gx);
    let angle = (gy as f32 / tx).atan() + FRAC_PI_2;
    (angle * ORIENTATION_SCALE) as u8
}
