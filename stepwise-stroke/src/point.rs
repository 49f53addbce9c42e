#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a [`PathPoint`] connects to the point before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SegmentType {
    /// Starts a new subpath without connecting to the previous point.
    MoveTo,

    /// A straight segment from the previous point.
    #[default]
    LineTo,

    /// A cubic Bezier segment from the previous endpoint, using the two [`SegmentType::Control`]
    /// points immediately before this one.
    CurveTo,

    /// A control point of the following [`SegmentType::CurveTo`] segment.
    Control,
}

/// A point of a path, in graph units.
///
/// Points with `NaN` coordinates are undefined. They are used as separators between the runs of a
/// stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub segment_type: SegmentType,
}

impl PathPoint {
    /// Creates a new point.
    pub fn new(x: f64, y: f64, segment_type: SegmentType) -> Self {
        Self { x, y, segment_type }
    }

    /// The undefined point used to separate the runs of a stroke.
    pub fn separator() -> Self {
        Self::new(f64::NAN, f64::NAN, SegmentType::LineTo)
    }

    /// Returns true if both coordinates are numbers.
    pub fn is_defined(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan()
    }

    /// Returns a copy of this point with the given segment type.
    pub fn with_type(self, segment_type: SegmentType) -> Self {
        Self { segment_type, ..self }
    }

    /// Returns the squared distance between two points.
    pub fn distance_sqr(&self, other: &PathPoint) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for PathPoint {
    fn from((x, y): (f64, f64)) -> PathPoint {
        PathPoint::new(x, y, SegmentType::LineTo)
    }
}
