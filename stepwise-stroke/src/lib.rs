//! Conversion of sampled pen strokes into renderable paths.
//!
//! A stroke is an ordered list of [`PathPoint`]s. Undefined points (with `NaN` coordinates)
//! split the stroke into runs. [`smooth`] decimates each run and replaces its straight segments
//! by cubic Bezier curves with continuous tangents, inserting two [`SegmentType::Control`]
//! points before every [`SegmentType::CurveTo`] point.
//!
//! [`LocusStroke`] owns the resulting point list and caches the view of the list without its
//! control points.
//!
//! ```
//! use stepwise_stroke::{smooth, PathPoint, SegmentType, SmoothingOptions};
//!
//! let stroke = [
//!     PathPoint::new(0.0, 0.0, SegmentType::LineTo),
//!     PathPoint::new(1.0, 1.0, SegmentType::LineTo),
//!     PathPoint::new(2.0, 0.0, SegmentType::LineTo),
//! ];
//! let path = smooth(&stroke, 0, 0.0, &SmoothingOptions::default());
//!
//! assert_eq!(path[0].segment_type, SegmentType::MoveTo);
//! assert_eq!(path.last().map(|p| p.segment_type), Some(SegmentType::CurveTo));
//! ```

pub mod locus;
pub mod opts;
pub mod point;
pub mod smooth;

pub use locus::LocusStroke;
pub use opts::SmoothingOptions;
pub use point::{PathPoint, SegmentType};
pub use smooth::smooth;
