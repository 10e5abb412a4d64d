//! Square min and max filters.
//!
//! Both are separable: a horizontal pass followed by a vertical pass, each
//! taking the extreme over `size` samples centred on the pixel. The window
//! is clipped at the image border, which is equivalent to replicating the
//! edge pixels.

use crate::error::ExtractError;
use crate::image::Plane;

/// Default filter side length.
pub const DEFAULT_FILTER_SIZE: usize = 5;

/// Which extreme a rank filter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

impl Extreme {
    #[inline]
    fn pick(self, a: u8, b: u8) -> u8 {
        match self {
            Extreme::Min => a.min(b),
            Extreme::Max => a.max(b),
        }
    }
}

/// `size × size` maximum filter.
pub fn max_filter(src: &Plane, size: usize) -> Result<Plane, ExtractError> {
    rank_filter(src, size, Extreme::Max)
}

/// `size × size` minimum filter.
pub fn min_filter(src: &Plane, size: usize) -> Result<Plane, ExtractError> {
    rank_filter(src, size, Extreme::Min)
}

fn rank_filter(src: &Plane, size: usize, extreme: Extreme) -> Result<Plane, ExtractError> {
    let w = src.width();
    let h = src.height();
    let radius = size / 2;

    let mut horizontal = Plane::zeroed(w, h)?;
    for y in 0..h {
        let row = src.row(y);
        for (x, dst) in horizontal.row_mut(y).iter_mut().enumerate() {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(w - 1);
            *dst = row[lo..=hi]
                .iter()
                .fold(row[x], |acc, &v| extreme.pick(acc, v));
        }
    }

    let mut out = Plane::zeroed(w, h)?;
    for y in 0..h {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(h - 1);
        for x in 0..w {
            let mut acc = horizontal.get(x, y);
            for yy in lo..=hi {
                acc = extreme.pick(acc, horizontal.get(x, yy));
            }
            out.row_mut(y)[x] = acc;
        }
    }
    Ok(out)
}
