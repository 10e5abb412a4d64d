//! Error types for feature extraction.
//!
//! Every failure is a deterministic function of the input and is returned
//! before any plane is produced; nothing is retried or logged-and-ignored.

use thiserror::Error;

/// Why an input image was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The image does not have exactly three interleaved channels.
    #[error("the image must be a 3-channel color image, got {found} channel(s)")]
    ChannelCount { found: usize },

    /// Height or width is zero.
    #[error("image dimensions must be positive, got {height}x{width}")]
    EmptyDimension { height: usize, width: usize },

    /// The pixel buffer is shorter than the declared shape requires.
    #[error("pixel buffer holds {actual} bytes, shape requires {expected}")]
    BufferTooShort { expected: usize, actual: usize },

    /// The row stride is shorter than one row of samples.
    #[error("row stride {stride} is smaller than the row length {row_len}")]
    StrideTooSmall { stride: usize, row_len: usize },
}

/// Errors returned by [`ChannelExtractor`](crate::ChannelExtractor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Malformed image: wrong channel count, empty or inconsistent shape.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// A plane buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes for feature planes")]
    AllocationFailure { bytes: usize },

    /// Arithmetic produced a value outside its domain. Indicates a bug.
    #[error("internal numeric failure: {0}")]
    InternalNumericFailure(String),
}

/// Allocate a zero-filled buffer, reporting allocator failure instead of
/// aborting.
pub(crate) fn try_zeroed<T: Copy + Default>(len: usize) -> Result<Vec<T>, ExtractError> {
    let bytes = len.saturating_mul(std::mem::size_of::<T>());
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ExtractError::AllocationFailure { bytes })?;
    buf.resize(len, T::default());
    Ok(buf)
}
