//! Fixed-point BT.601 intensity.

/// Fractional bits of the fixed-point luma weights.
const LUMA_SHIFT: u32 = 14;

// 0.299, 0.587 and 0.114 scaled by 2^14; they sum to exactly 2^14.
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;

/// Intensity of one 8-bit RGB pixel, rounded to nearest.
///
/// Integer-only so that the intensity plane, and every derivative built on
/// it, is bit-exact across platforms.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT;
    ((sum + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        assert_eq!(R_WEIGHT + G_WEIGHT + B_WEIGHT, 1 << LUMA_SHIFT);
    }

    #[test]
    fn test_gray_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(luma(v, v, v), v);
        }
    }

    #[test]
    fn test_primaries() {
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }
}
