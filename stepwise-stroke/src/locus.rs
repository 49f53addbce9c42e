use once_cell::unsync::OnceCell;
use tracing::instrument;
use super::{opts::SmoothingOptions, point::{PathPoint, SegmentType}, smooth::smooth};

/// A pen stroke, stored as the smoothed path of its sampled points.
///
/// The view of the path without its control points is computed on first access and cached until
/// the path changes.
#[derive(Clone, Debug, Default)]
pub struct LocusStroke {
    /// The path, including the control points of its curves.
    points: Vec<PathPoint>,

    /// The options used when the path is updated from sampled points.
    options: SmoothingOptions,

    /// [`LocusStroke::points`] without the control points.
    without_control: OnceCell<Vec<PathPoint>>,
}

impl LocusStroke {
    /// Creates a stroke by smoothing the given sampled points, without decimation.
    pub fn new(data: &[PathPoint]) -> Self {
        Self::with_options(data, SmoothingOptions::default())
    }

    /// Creates a stroke by smoothing the given sampled points with the given options, without
    /// decimation.
    pub fn with_options(data: &[PathPoint], options: SmoothingOptions) -> Self {
        let mut stroke = Self {
            points: Vec::new(),
            options,
            without_control: OnceCell::new(),
        };
        stroke.update_point_array(data, 0, 0.0);
        stroke
    }

    /// Replaces the path by the smoothed form of the given sampled points. See [`smooth`] for the
    /// meaning of `initial_index` and `scale`.
    #[instrument(level = "debug", skip(self, data), fields(points = data.len()))]
    pub fn update_point_array(&mut self, data: &[PathPoint], initial_index: usize, scale: f64) {
        let points = smooth(data, initial_index, scale, &self.options);
        self.set_points(points);
    }

    /// Replaces the path by the given points, which are used as is.
    pub fn update_from(&mut self, data: &[PathPoint]) {
        self.set_points(data.to_vec());
    }

    fn set_points(&mut self, points: Vec<PathPoint>) {
        self.points = points;
        self.without_control.take();
    }

    /// The options used when the path is updated from sampled points.
    pub fn options(&self) -> &SmoothingOptions {
        &self.options
    }

    /// The full path, including control points.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// The number of points of the full path.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// The path without its control points, in order.
    pub fn points_without_control(&self) -> &[PathPoint] {
        self.without_control.get_or_init(|| {
            self.points.iter()
                .filter(|point| point.segment_type != SegmentType::Control)
                .copied()
                .collect()
        })
    }
}
