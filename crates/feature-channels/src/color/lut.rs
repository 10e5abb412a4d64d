//! Gamma lookup table access
//!
//! The table is generated at compile time by build.rs with one entry per
//! 8-bit sample, so decoding is a plain index with no interpolation.

// Include the generated LUT from build.rs
include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert an 8-bit sRGB sample to linear light (0.0..=1.0).
#[inline]
pub fn srgb8_to_linear(sample: u8) -> f32 {
    SRGB8_TO_LINEAR[sample as usize]
}
