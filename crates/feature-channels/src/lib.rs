#![allow(clippy::excessive_precision, clippy::needless_range_loop)]

//! feature-channels: per-pixel feature planes for Hough-forest detectors
//!
//! Turns an 8-bit RGB image into an ordered stack of 8-bit planes, one
//! value per pixel each: CIE L\*a\*b\* color, absolute image derivatives,
//! and a Gaussian-weighted histogram of gradient orientations, followed by
//! 5×5 min/max filtered variants. The plane order is a contract with the
//! trained forests that consume it.
//!
//! # Quick Start
//!
//! ```
//! use feature_channels::{extract_features, ImageView};
//!
//! let pixels = vec![200u8; 16 * 12 * 3];
//! let image = ImageView::new(&pixels, 16, 12, 3).unwrap();
//!
//! let compact = extract_features(&image, false).unwrap();
//! let full = extract_features(&image, true).unwrap();
//! assert_eq!((compact.len(), full.len()), (15, 32));
//! assert_eq!(compact.plane(0).unwrap().width(), 16);
//! ```
//!
//! # Plane Order
//!
//! | Mode    | Index  | Content                                      |
//! |---------|--------|----------------------------------------------|
//! | Compact | 0–2    | L, a, b after a 5×5 maximum filter           |
//! | Compact | 3–11   | orientation bins 0–8                         |
//! | Compact | 12–14  | L, a, b after a 5×5 minimum filter           |
//! | Full    | 0–15   | L, a, b, \|Ix\|, \|Iy\|, \|Ixx\|, \|Iyy\|, bins 0–8, 5×5 maximum |
//! | Full    | 16–31  | the same sixteen planes, 5×5 minimum          |
//!
//! [`ChannelMode::layout`] returns the same information as [`PlaneId`]s.
//!
//! # Pipeline
//!
//! 1. RGB → L\*a\*b\* (D65), L scaled to 0..=255, a and b offset by 128.
//! 2. RGB → BT.601 luma.
//! 3. 3×3 Sobel derivatives of the luma with reflect-101 borders.
//! 4. Gradient magnitude (saturated) and orientation quantized to 0..=251.
//! 5. Orientation histogram: 9 bins, 5×5 Gaussian-weighted window, linear
//!    vote split between neighbouring bins. Pixels closer than two pixels
//!    to the border get an empty histogram.
//! 6. Separable 5×5 min/max filters, windows clipped at the border.
//!
//! Every stage is a pure function of its input; extraction is
//! deterministic and can run on many threads at once.

pub mod color;
pub mod error;
pub mod extract;
pub mod gradient;
pub mod histogram;
pub mod image;
pub mod morphology;


pub use error::{ExtractError, InputError};
pub use extract::{
    extract_features, ChannelExtractor, ChannelMode, FeatureStack, PlaneFilter, PlaneId, PlaneKind,
};
pub use image::{ImageView, PixelSource, Plane};
