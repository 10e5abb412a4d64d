//! Image derivatives and their polar form.
//!
//! - [`sobel`] convolves the intensity plane with a 3×3 Sobel kernel of
//!   order 1 or 2 along either axis, with reflect-101 borders, into signed
//!   16-bit [`DerivativeMap`]s.
//! - [`GradientPolar`] turns a first-order pair into saturated magnitude
//!   and a π-periodic orientation quantized to 80 steps per radian, the
//!   inputs of the orientation histogram.

mod polar;
mod sobel;

pub use polar::{GradientPolar, ORIENTATION_SCALE};
pub use sobel::{sobel, Axis, DerivativeMap, Order};

/// Map an out-of-range index back into `0..len` by mirroring around the
/// edge pixels without repeating them (`-1 → 1`, `len → len - 2`).
///
/// A one-pixel extent maps every index to 0.
#[inline]
pub(crate) fn reflect101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let n = len as isize;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect101_inside() {
        for i in 0..5 {
            assert_eq!(reflect101(i, 5), i as usize);
        }
    }

    #[test]
    fn test_reflect101_edges() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
    }

    #[test]
    fn test_reflect101_tiny_extents() {
        assert_eq!(reflect101(-1, 1), 0);
        assert_eq!(reflect101(1, 1), 0);
        assert_eq!(reflect101(-1, 2), 1);
        assert_eq!(reflect101(2, 2), 0);
        assert_eq!(reflect101(-2, 2), 0);
    }
}
