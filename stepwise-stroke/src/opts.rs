use std::f64::consts::PI;

/// Options to use when smoothing a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingOptions {
    /// Whether to replace the segments of the stroke by Bezier curves. If disabled, the stroke is
    /// returned as a polyline.
    ///
    /// The default value is `true`.
    pub smoothing: bool,

    /// During decimation, a point can only be dropped if the path turns by less than this angle,
    /// in radians, at that point.
    ///
    /// The default value is `π / 18` (10 degrees).
    pub angle_threshold: f64,

    /// During decimation, a point can only be dropped if it is closer than this distance, in
    /// device pixels, to the last kept point. The distance is converted to graph units with the
    /// view scale passed to [`smooth`](crate::smooth).
    ///
    /// The default value is `500.0`.
    pub decimation_distance: f64,
}

/// The default options for smoothing. Returns a [`SmoothingOptions`] with the following values:
///
/// - [`smoothing`](SmoothingOptions::smoothing): `true`
/// - [`angle_threshold`](SmoothingOptions::angle_threshold): `π / 18`
/// - [`decimation_distance`](SmoothingOptions::decimation_distance): `500.0`
impl Default for SmoothingOptions {
    fn default() -> SmoothingOptions {
        SmoothingOptions {
            smoothing: true,
            angle_threshold: PI / 18.0,
            decimation_distance: 500.0,
        }
    }
}

impl SmoothingOptions {
    /// Set whether to smooth the stroke. Returns an updated [`SmoothingOptions`] for chaining.
    pub fn smoothing(mut self, smoothing: bool) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the angle threshold used for decimation. Returns an updated [`SmoothingOptions`] for
    /// chaining.
    pub fn angle_threshold(mut self, angle_threshold: f64) -> Self {
        self.angle_threshold = angle_threshold;
        self
    }

    /// Set the distance threshold used for decimation. Returns an updated [`SmoothingOptions`]
    /// for chaining.
    pub fn decimation_distance(mut self, decimation_distance: f64) -> Self {
        self.decimation_distance = decimation_distance;
        self
    }

    /// The squared decimation distance in graph units, for the given view scale.
    pub(crate) fn decimation_distance_sqr(&self, scale: f64) -> f64 {
        let distance = self.decimation_distance / scale;
        distance * distance
    }
}
