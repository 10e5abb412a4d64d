//! Plane identity and order.
//!
//! Downstream forest models address planes by index, so the order below is
//! part of the public contract and must not change between versions.
//!
//! ```text
//! Compact (15)                      Full (32)
//!  0- 2  L a b        max 5x5        0- 2  L a b            max 5x5
//!  3-11  orientation 0-8             3- 4  |Ix| |Iy|        max 5x5
//! 12-14  L a b        min 5x5        5- 6  |Ixx| |Iyy|      max 5x5
//!                                    7-15  orientation 0-8  max 5x5
//!                                   16-31  planes 0-15 again, min 5x5
//! ```

use std::fmt;

use crate::histogram::DEFAULT_BINS;

/// Which stack to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelMode {
    /// 15 planes: filtered Lab plus the orientation histogram.
    #[default]
    Compact,
    /// 32 planes: adds absolute first and second derivatives and a min/max
    /// filtered copy of every base plane.
    Full,
}

impl ChannelMode {
    /// `full == true` selects [`ChannelMode::Full`].
    #[inline]
    pub fn from_full(full: bool) -> Self {
        if full {
            ChannelMode::Full
        } else {
            ChannelMode::Compact
        }
    }

    #[inline]
    pub fn is_full(self) -> bool {
        self == ChannelMode::Full
    }

    /// Number of planes in the stack.
    #[inline]
    pub const fn plane_count(self) -> usize {
        match self {
            ChannelMode::Compact => 15,
            ChannelMode::Full => 32,
        }
    }

    /// Identity of every plane, in stack order.
    pub fn layout(self) -> Vec<PlaneId> {
        let lab = [PlaneKind::Lightness, PlaneKind::GreenRed, PlaneKind::BlueYellow];
        let orientation = (0..DEFAULT_BINS as u8).map(PlaneKind::Orientation);
        match self {
            ChannelMode::Compact => {
                let mut ids: Vec<PlaneId> = lab
                    .iter()
                    .map(|&k| PlaneId::new(k, PlaneFilter::Max))
                    .collect();
                ids.extend(orientation.map(|k| PlaneId::new(k, PlaneFilter::None)));
                ids.extend(lab.iter().map(|&k| PlaneId::new(k, PlaneFilter::Min)));
                ids
            }
            ChannelMode::Full => {
                let base: Vec<PlaneKind> = lab
                    .into_iter()
                    .chain([
                        PlaneKind::AbsDx,
                        PlaneKind::AbsDy,
                        PlaneKind::AbsDxx,
                        PlaneKind::AbsDyy,
                    ])
                    .chain(orientation)
                    .collect();
                let max = base.iter().map(|&k| PlaneId::new(k, PlaneFilter::Max));
                let min = base.iter().map(|&k| PlaneId::new(k, PlaneFilter::Min));
                max.chain(min).collect()
            }
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMode::Compact => write!(f, "compact"),
            ChannelMode::Full => write!(f, "full"),
        }
    }
}

/// The quantity a plane holds before filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    /// L\*, scaled to 0..=255.
    Lightness,
    /// a\*, offset by 128.
    GreenRed,
    /// b\*, offset by 128.
    BlueYellow,
    /// |∂I/∂x| / 4.
    AbsDx,
    /// |∂I/∂y| / 4.
    AbsDy,
    /// |∂²I/∂x²| / 4.
    AbsDxx,
    /// |∂²I/∂y²| / 4.
    AbsDyy,
    /// Gaussian-weighted orientation histogram bin.
    Orientation(u8),
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaneKind::Lightness => write!(f, "lab-l"),
            PlaneKind::GreenRed => write!(f, "lab-a"),
            PlaneKind::BlueYellow => write!(f, "lab-b"),
            PlaneKind::AbsDx => write!(f, "abs-dx"),
            PlaneKind::AbsDy => write!(f, "abs-dy"),
            PlaneKind::AbsDxx => write!(f, "abs-dxx"),
            PlaneKind::AbsDyy => write!(f, "abs-dyy"),
            PlaneKind::Orientation(bin) => write!(f, "orientation-{bin}"),
        }
    }
}

/// Neighbourhood filter applied after computing a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneFilter {
    None,
    /// 5×5 maximum.
    Max,
    /// 5×5 minimum.
    Min,
}

/// Identity of one plane in a [`FeatureStack`](super::FeatureStack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneId {
    pub kind: PlaneKind,
    pub filter: PlaneFilter,
}

impl PlaneId {
    #[inline]
    pub const fn new(kind: PlaneKind, filter: PlaneFilter) -> Self {
        Self { kind, filter }
    }

    /// Whether this plane depends on image gradients (and is therefore 0 on
    /// a flat image).
    #[inline]
    pub fn is_gradient(&self) -> bool {
        !matches!(
            self.kind,
            PlaneKind::Lightness | PlaneKind::GreenRed | PlaneKind::BlueYellow
        )
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.filter {
            PlaneFilter::None => write!(f, "{}", self.kind),
            PlaneFilter::Max => write!(f, "{}/max", self.kind),
            PlaneFilter::Min => write!(f, "{}/min", self.kind),
        }
    }
}
