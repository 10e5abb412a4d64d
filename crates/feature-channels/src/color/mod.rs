//! Color conversions used to build the color feature planes.
//!
//! Input pixels are 8-bit gamma-encoded sRGB samples in R, G, B order.
//! Two derived representations are needed:
//!
//! - [`luma`]: BT.601 intensity in fixed point, the input of every
//!   derivative filter.
//! - [`Lab`]: CIE L\*a\*b\* (D65) encoded into three 8-bit planes, the
//!   color channels of the feature stack.
//!
//! # Example
//!
//! ```
//! use feature_channels::color::{luma, Lab};
//!
//! assert_eq!(luma(255, 255, 255), 255);
//! assert_eq!(Lab::from_srgb8(255, 255, 255).to_bytes(), [255, 128, 128]);
//! ```

mod lab;
mod linear_rgb;
mod lut;
mod luma;

pub use lab::Lab;
pub use linear_rgb::LinearRgb;
pub use lut::srgb8_to_linear;
pub use luma::luma;
