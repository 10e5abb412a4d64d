//! CIE L\*a\*b\* color type and its 8-bit plane encoding.
//!
//! Conversion goes sRGB → linear RGB → XYZ (D65) → L\*a\*b\*. The 8-bit
//! encoding maps L from 0..=100 onto 0..=255 and offsets a and b by 128,
//! the usual layout for 8-bit Lab images.

use super::linear_rgb::LinearRgb;

/// D65 reference white, X component (Y is 1.0).
const WHITE_X: f32 = 0.950456;
/// D65 reference white, Z component.
const WHITE_Z: f32 = 1.088754;

/// Linear sRGB to XYZ (D65). Rows sum to the reference white, so neutral
/// colors land exactly on a = b = 0.
const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

/// Below this ratio the cube root is replaced by a linear segment.
const EPSILON: f32 = 0.008856;
const KAPPA_SLOPE: f32 = 7.787;
const KAPPA_OFFSET: f32 = 16.0 / 116.0;

/// Scale from L (0..=100) to the 8-bit range.
const L_TO_BYTE: f32 = 255.0 / 100.0;
/// Offset that centres a and b in the 8-bit range.
const AB_OFFSET: f32 = 128.0;

/// A color in CIE L\*a\*b\* space, D65 white point.
///
/// # Components
///
/// - `l`: Lightness, 0.0 (black) to 100.0 (white)
/// - `a`: Green-red axis (negative = green, positive = red)
/// - `b`: Blue-yellow axis (negative = blue, positive = yellow)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness: 0.0 to 100.0
    pub l: f32,
    /// Green-red axis
    pub a: f32,
    /// Blue-yellow axis
    pub b: f32,
}

impl Lab {
    /// Create a new Lab color.
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Convert one 8-bit sRGB pixel.
    ///
    /// # Example
    ///
    /// ```
    /// use feature_channels::color::Lab;
    ///
    /// let black = Lab::from_srgb8(0, 0, 0);
    /// assert!(black.l.abs() < 1e-4);
    /// ```
    #[inline]
    pub fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from(LinearRgb::from_srgb8(r, g, b))
    }

    /// Encode as three bytes `[L, a, b]`.
    ///
    /// L is scaled by 255/100, a and b are offset by 128. Values are
    /// rounded and saturated to 0..=255.
    ///
    /// # Example
    ///
    /// ```
    /// use feature_channels::color::Lab;
    ///
    /// assert_eq!(Lab::from_srgb8(255, 0, 0).to_bytes(), [136, 208, 195]);
    /// ```
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            encode(self.l * L_TO_BYTE),
            encode(self.a + AB_OFFSET),
            encode(self.b + AB_OFFSET),
        ]
    }
}

#[inline]
fn encode(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA_SLOPE * t + KAPPA_OFFSET
    }
}

impl From<LinearRgb> for Lab {
    fn from(rgb: LinearRgb) -> Self {
        let [rx, ry, rz] = RGB_TO_XYZ;
        let x = rx[0] * rgb.r + rx[1] * rgb.g + rx[2] * rgb.b;
        let y = ry[0] * rgb.r + ry[1] * rgb.g + ry[2] * rgb.b;
        let z = rz[0] * rgb.r + rz[1] * rgb.g + rz[2] * rgb.b;

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y);
        let fz = lab_f(z / WHITE_Z);

        // 116 * f(Y) - 16 also covers the linear segment (903.3 * Y)
        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}
