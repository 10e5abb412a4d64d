use feature_channels::ExtractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("expected an array of shape (height, width, 3), got {shape:?}")]
    InvalidShape { shape: Vec<usize> },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("failed to allocate {bytes} bytes for the output array")]
    AllocationFailure { bytes: usize },
}

#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported pixel layout: {color_type} at {bit_depth} bits")]
    UnsupportedPixelLayout { color_type: String, bit_depth: u8 },

    #[error("Sidecar error: {0}")]
    Sidecar(String),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Image(#[from] ImageIoError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl From<serde_json::Error> for ImageIoError {
    fn from(e: serde_json::Error) -> Self {
        ImageIoError::Sidecar(e.to_string())
    }
}
