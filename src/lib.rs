//! hough-features - Hough-forest feature channels
//!
//! Typed-array front end, PNG tooling and batch runner around the
//! [`feature_channels`] extractor.
//! This library exposes modules for integration testing.

pub mod adapter;
pub mod array_view;
pub mod batch;
pub mod config;
pub mod error;
pub mod io;
pub mod lock;

pub use adapter::BufferAdapter;
pub use error::{AdapterError, BatchError, ImageIoError};
pub use lock::{CoordinationLock, ExclusiveLock, ReleasedRegion, Uncoordinated};
