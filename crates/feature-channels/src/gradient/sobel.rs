//! 3×3 Sobel derivatives on an 8-bit plane.

use super::reflect101;
use crate::error::{try_zeroed, ExtractError};
use crate::image::Plane;

type Kernel3 = [i32; 3];

const SMOOTH: Kernel3 = [1, 2, 1];
const FIRST_DIFF: Kernel3 = [-1, 0, 1];
const SECOND_DIFF: Kernel3 = [1, -2, 1];

/// Direction of differentiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// d/dx, along a row.
    Horizontal,
    /// d/dy, along a column.
    Vertical,
}

/// Derivative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    First,
    Second,
}

impl Order {
    fn kernel(self) -> Kernel3 {
        match self {
            Order::First => FIRST_DIFF,
            Order::Second => SECOND_DIFF,
        }
    }
}

/// Signed derivative responses, row-major.
///
/// 3×3 responses on 8-bit input stay within ±2040, so `i16` never
/// overflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivativeMap {
    width: usize,
    height: usize,
    data: Vec<i16>,
}

impl DerivativeMap {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> i16 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn as_slice(&self) -> &[i16] {
        &self.data
    }

    /// `|v| * scale`, rounded half-to-even and saturated to 0..=255.
    pub fn abs_scaled(&self, scale: f32) -> Result<Plane, ExtractError> {
        let mut plane = Plane::zeroed(self.width, self.height)?;
        for (dst, &v) in plane.as_mut_slice().iter_mut().zip(&self.data) {
            *dst = (v as f32 * scale).abs().round_ties_even().min(255.0) as u8;
        }
        Ok(plane)
    }
}

/// Convolve `src` with the separable Sobel kernel of `order` along `axis`;
/// the orthogonal direction is smoothed with `[1 2 1]`.
pub fn sobel(src: &Plane, axis: Axis, order: Order) -> Result<DerivativeMap, ExtractError> {
    let w = src.width();
    let h = src.height();
    let (kernel_x, kernel_y) = match axis {
        Axis::Horizontal => (order.kernel(), SMOOTH),
        Axis::Vertical => (SMOOTH, order.kernel()),
    };
    let mut data: Vec<i16> = try_zeroed(w * h)?;

    for y in 0..h {
        let yi = y as isize;
        let rows = [
            src.row(reflect101(yi - 1, h)),
            src.row(y),
            src.row(reflect101(yi + 1, h)),
        ];
        let out = &mut data[y * w..(y + 1) * w];
        for (x, dst) in out.iter_mut().enumerate() {
            let xi = x as isize;
            let cols = [reflect101(xi - 1, w), x, reflect101(xi + 1, w)];
            let mut acc = 0i32;
            for (row, &wy) in rows.iter().zip(&kernel_y) {
                if wy == 0 {
                    continue;
                }
                let horiz = kernel_x[0] * row[cols[0]] as i32
                    + kernel_x[1] * row[cols[1]] as i32
                    + kernel_x[2] * row[cols[2]] as i32;
                acc += wy * horiz;
            }
            *dst = acc as i16;
        }
    }

    Ok(DerivativeMap {
        width: w,
        height: h,
        data,
    })
}
