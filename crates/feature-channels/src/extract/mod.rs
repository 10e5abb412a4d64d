//! The channel extractor and the plane-order contract it produces.

mod extractor;
mod layout;
mod stack;

pub use extractor::{extract_features, ChannelExtractor};
pub use layout::{ChannelMode, PlaneFilter, PlaneId, PlaneKind};
pub use stack::FeatureStack;
