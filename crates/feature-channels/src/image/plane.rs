//! Owned single-channel 8-bit plane.

use crate::error::{try_zeroed, ExtractError};

/// One H×W feature plane, row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Plane {
    /// Allocate a zero-filled plane.
    pub fn zeroed(width: usize, height: usize) -> Result<Self, ExtractError> {
        let len = width
            .checked_mul(height)
            .ok_or(ExtractError::AllocationFailure { bytes: usize::MAX })?;
        Ok(Self {
            width,
            height,
            data: try_zeroed(len)?,
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `data.len() == width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width * height,
            "plane data length ({}) must match width * height ({}x{})",
            data.len(),
            width,
            height,
        );
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// All pixels, row-major.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_shape() {
        let plane = Plane::zeroed(4, 3).unwrap();
        assert_eq!(plane.as_slice().len(), 12);
        assert!(plane.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_row_access() {
        let plane = Plane::from_vec(3, 2, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(plane.row(1), &[4, 5, 6]);
        assert_eq!(plane.get(0, 1), 4);
    }

    #[test]
    fn test_overflowing_shape_is_allocation_failure() {
        let result = Plane::zeroed(usize::MAX, 2);
        assert!(matches!(
            result,
            Err(ExtractError::AllocationFailure { .. })
        ));
    }
}
