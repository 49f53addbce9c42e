//! Decimation and Bezier smoothing of pen strokes.
//!
//! The stroke is split into runs of defined points. Each run is decimated (if a view scale is
//! given), then every segment of the run is replaced by a cubic Bezier curve whose control
//! points are chosen so that consecutive curves have the same tangent at their common endpoint.
//! This requires solving a tridiagonal linear system per coordinate, which is done with the
//! Thomas algorithm in [`solve_tridiagonal`].

use std::f64::consts::{FRAC_PI_2, PI};
use tracing::{debug, trace};
use super::{opts::SmoothingOptions, point::{PathPoint, SegmentType}};

/// Returns how much the path `a -> b -> c` turns at `b`, in radians. Collinear points in order
/// give `0`, and turning back on the same line gives `π`.
pub(crate) fn angle(a: &PathPoint, b: &PathPoint, c: &PathPoint) -> f64 {
    let (dx1, dy1) = (a.x - b.x, a.y - b.y);
    let (dx2, dy2) = (c.x - b.x, c.y - b.y);
    let between = (dx1 * dy2 - dy1 * dx2).abs().atan2(dx1 * dx2 + dy1 * dy2);
    PI - between
}

/// Returns true if the data contains at least two consecutive defined points.
fn can_be_bezier_curve(data: &[PathPoint]) -> bool {
    data.windows(2).any(|pair| pair[0].is_defined() && pair[1].is_defined())
}

/// Returns the run of defined points starting at `index`. The run ends before the first undefined
/// point, or before the first [`SegmentType::MoveTo`] point other than the first one.
fn run_at(data: &[PathPoint], index: usize) -> &[PathPoint] {
    let len = data[index..]
        .iter()
        .enumerate()
        .take_while(|(i, point)| {
            point.is_defined() && (*i == 0 || point.segment_type != SegmentType::MoveTo)
        })
        .count();
    &data[index..index + len]
}

/// The plain polyline through all points: the first point moves, the rest draw lines.
fn polyline(data: &[PathPoint]) -> Vec<PathPoint> {
    data.iter()
        .enumerate()
        .map(|(i, point)| {
            point.with_type(if i == 0 { SegmentType::MoveTo } else { SegmentType::LineTo })
        })
        .collect()
}

/// Drops the interior points of a run where the path barely turns and that are close to the last
/// kept point.
///
/// When a point is kept after a streak of dropped points, the last dropped point is kept as well,
/// so sharp corners reached through many small steps are not cut.
pub fn decimate(run: &[PathPoint], distance_sqr: f64, angle_threshold: f64) -> Vec<PathPoint> {
    let Some((first, rest)) = run.split_first() else {
        return Vec::new();
    };

    let mut kept = vec![*first];
    let mut last_used = *first;
    let mut last_skipped = None;
    for (i, point) in rest.iter().enumerate() {
        if let Some(next) = rest.get(i + 1) {
            if angle(&last_used, point, next) < angle_threshold
                && last_used.distance_sqr(point) < distance_sqr
            {
                last_skipped = Some(*point);
                continue;
            }
        }

        last_used = *point;
        kept.extend(last_skipped.take());
        kept.push(*point);
    }

    trace!(before = run.len(), after = kept.len(), "decimated run");
    kept
}

/// Solves the tridiagonal system `a[i] x[i - 1] + b[i] x[i] + c[i] x[i + 1] = r[i]` with the
/// Thomas algorithm. `a[0]` and `c[n - 1]` are ignored.
///
/// The system must be diagonally dominant (as the systems built by [`control_points`] are),
/// otherwise the elimination may divide by zero.
pub fn solve_tridiagonal(a: &[f64], b: &[f64], c: &[f64], r: &[f64]) -> Vec<f64> {
    let n = r.len();
    if n == 0 {
        return Vec::new();
    }

    let mut b = b.to_vec();
    let mut r = r.to_vec();
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m * c[i - 1];
        r[i] -= m * r[i - 1];
    }

    let mut x = vec![0.0; n];
    x[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = (r[i] - c[i] * x[i + 1]) / b[i];
    }
    x
}

/// The two control points of each segment of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlPoints {
    /// The control point next to the start of each segment.
    pub first: Vec<PathPoint>,

    /// The control point next to the end of each segment.
    pub second: Vec<PathPoint>,
}

/// Computes the control points of the Bezier curves through the given points, one curve per
/// segment, such that consecutive curves share their tangent and curvature at the common point.
pub fn control_points(points: &[PathPoint]) -> ControlPoints {
    let control = |x: f64, y: f64| PathPoint::new(x, y, SegmentType::Control);

    let n = points.len().saturating_sub(1);
    match n {
        0 => return ControlPoints::default(),
        1 => {
            // a single segment is drawn straight
            let (p0, p1) = (points[0], points[1]);
            return ControlPoints {
                first: vec![control((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0)],
                second: vec![control((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0)],
            };
        },
        _ => {},
    }

    let mut a = vec![1.0; n];
    let mut b = vec![4.0; n];
    let mut c = vec![1.0; n];
    let mut rx = Vec::with_capacity(n);
    let mut ry = Vec::with_capacity(n);

    // leftmost segment
    a[0] = 0.0;
    b[0] = 2.0;
    rx.push(points[0].x + 2.0 * points[1].x);
    ry.push(points[0].y + 2.0 * points[1].y);

    for i in 1..n - 1 {
        rx.push(4.0 * points[i].x + 2.0 * points[i + 1].x);
        ry.push(4.0 * points[i].y + 2.0 * points[i + 1].y);
    }

    // rightmost segment
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    c[n - 1] = 0.0;
    rx.push(8.0 * points[n - 1].x + points[n].x);
    ry.push(8.0 * points[n - 1].y + points[n].y);

    let xs = solve_tridiagonal(&a, &b, &c, &rx);
    let ys = solve_tridiagonal(&a, &b, &c, &ry);
    let first = xs.iter()
        .zip(&ys)
        .map(|(&x, &y)| control(x, y))
        .collect::<Vec<_>>();

    let mut second = (0..n - 1)
        .map(|i| control(2.0 * points[i + 1].x - xs[i + 1], 2.0 * points[i + 1].y - ys[i + 1]))
        .collect::<Vec<_>>();
    second.push(control(0.5 * (points[n].x + xs[n - 1]), 0.5 * (points[n].y + ys[n - 1])));

    ControlPoints { first, second }
}

/// Appends the segments of a decimated run, whose first point has already been emitted.
///
/// A segment is drawn as a curve only if both of its control points lie on the side of the
/// endpoint facing the previous point; otherwise the curve would overshoot and a straight line
/// is drawn instead.
fn emit_run(out: &mut Vec<PathPoint>, run: &[PathPoint]) {
    match run {
        [] => {},
        [only] => out.push(only.with_type(SegmentType::LineTo)),
        [_, end] => out.push(end.with_type(SegmentType::LineTo)),
        _ => {
            let controls = control_points(run);
            for (i, end) in run.iter().enumerate().skip(1) {
                let (ctrl1, ctrl2) = (controls.first[i - 1], controls.second[i - 1]);
                let last = out.last().copied().unwrap_or(run[i - 1]);
                if angle(&last, end, &ctrl1) > FRAC_PI_2 && angle(&last, end, &ctrl2) > FRAC_PI_2 {
                    out.push(ctrl1);
                    out.push(ctrl2);
                    out.push(end.with_type(SegmentType::CurveTo));
                } else {
                    out.push(end.with_type(SegmentType::LineTo));
                }
            }
        },
    }
}

/// Converts sampled stroke points into a path of lines and Bezier curves.
///
/// Points before `initial_index` are considered already smoothed and copied as is. The rest of
/// the data is split into runs at undefined points and at [`SegmentType::MoveTo`] points. Each
/// run starts with a [`SegmentType::MoveTo`] point, and is preceded by a
/// [`separator`](PathPoint::separator) if the previously emitted point is defined.
///
/// `scale` is the view scale in device pixels per graph unit, used to decimate the runs. A
/// scale of `0` disables decimation.
///
/// If smoothing is disabled, or the data has no two consecutive defined points, the plain
/// polyline through the data is returned instead.
pub fn smooth(
    data: &[PathPoint],
    initial_index: usize,
    scale: f64,
    options: &SmoothingOptions,
) -> Vec<PathPoint> {
    if !options.smoothing || !can_be_bezier_curve(data) {
        debug!(points = data.len(), "stroke drawn as polyline");
        return polyline(data);
    }

    let initial_index = initial_index.min(data.len());
    let mut out = data[..initial_index].to_vec();
    let mut index = initial_index;
    let mut runs = 0;
    while index < data.len() {
        let run = run_at(data, index);
        if let Some(start) = run.first() {
            if out.last().is_some_and(PathPoint::is_defined) {
                out.push(PathPoint::separator());
            }
            out.push(start.with_type(SegmentType::MoveTo));

            if scale > 0.0 {
                let kept = decimate(run, options.decimation_distance_sqr(scale), options.angle_threshold);
                emit_run(&mut out, &kept);
            } else {
                emit_run(&mut out, run);
            }
            runs += 1;
        }

        index += run.len().max(1);
    }

    debug!(points = data.len(), runs, output = out.len(), "smoothed stroke");
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    fn p(x: f64, y: f64) -> PathPoint {
        PathPoint::from((x, y))
    }

    fn types(points: &[PathPoint]) -> Vec<SegmentType> {
        points.iter().map(|point| point.segment_type).collect()
    }

    /// Every curve endpoint must be preceded by exactly two control points.
    fn assert_well_formed(points: &[PathPoint]) {
        for (i, point) in points.iter().enumerate() {
            match point.segment_type {
                SegmentType::CurveTo => {
                    assert!(i >= 2, "curve at {i} has no control points");
                    assert_eq!(points[i - 1].segment_type, SegmentType::Control);
                    assert_eq!(points[i - 2].segment_type, SegmentType::Control);
                    if i >= 3 {
                        assert_ne!(points[i - 3].segment_type, SegmentType::Control);
                    }
                },
                SegmentType::Control => {
                    let next_non_control = points[i..]
                        .iter()
                        .find(|p| p.segment_type != SegmentType::Control)
                        .map(|p| p.segment_type);
                    assert_eq!(next_non_control, Some(SegmentType::CurveTo));
                },
                _ => {},
            }
        }
    }

    #[test]
    fn turn_angle() {
        assert_relative_eq!(angle(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0)), 0.0);
        assert_relative_eq!(angle(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)), FRAC_PI_2);
        assert_relative_eq!(angle(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 0.0)), PI);
    }

    #[test]
    fn thomas_known_solution() {
        let x = solve_tridiagonal(
            &[0.0, 1.0, 2.0],
            &[2.0, 4.0, 7.0],
            &[1.0, 1.0, 0.0],
            &[4.0, 12.0, 25.0],
        );
        assert_eq!(x.len(), 3);
        for (computed, expected) in x.iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(*computed, expected, epsilon = 1e-12);
        }
        assert!(solve_tridiagonal(&[], &[], &[], &[]).is_empty());
    }

    #[test]
    fn straight_run_has_controls_on_line() {
        let controls = control_points(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]);
        let xs = |points: &[PathPoint]| points.iter().map(|p| p.x).collect::<Vec<_>>();

        for (computed, expected) in xs(&controls.first).into_iter().zip([1.0 / 3.0, 4.0 / 3.0]) {
            assert_relative_eq!(computed, expected, epsilon = 1e-12);
        }
        for (computed, expected) in xs(&controls.second).into_iter().zip([2.0 / 3.0, 5.0 / 3.0]) {
            assert_relative_eq!(computed, expected, epsilon = 1e-12);
        }
        assert!(controls.first.iter().chain(&controls.second).all(|c| c.y == 0.0));
        assert!(controls.first.iter().all(|c| c.segment_type == SegmentType::Control));
    }

    #[test]
    fn tangents_are_continuous() {
        let points = [p(0.0, 0.0), p(1.0, 2.0), p(3.0, 3.0), p(4.0, 1.0), p(6.0, 0.0)];
        let controls = control_points(&points);
        assert_eq!(controls.first.len(), 4);
        assert_eq!(controls.second.len(), 4);

        for i in 1..points.len() - 1 {
            let incoming = (points[i].x - controls.second[i - 1].x, points[i].y - controls.second[i - 1].y);
            let outgoing = (controls.first[i].x - points[i].x, controls.first[i].y - points[i].y);
            assert_relative_eq!(incoming.0, outgoing.0, epsilon = 1e-9);
            assert_relative_eq!(incoming.1, outgoing.1, epsilon = 1e-9);
        }
    }

    #[test]
    fn collinear_points_are_decimated() {
        let run = (0..=10).map(|i| p(i as f64, 0.0)).collect::<Vec<_>>();
        let options = SmoothingOptions::default();
        let kept = decimate(&run, options.decimation_distance_sqr(1.0), options.angle_threshold);
        assert_eq!(kept, vec![run[0], run[9], run[10]]);

        // far apart at this scale, so nothing is dropped
        let kept = decimate(&run, options.decimation_distance_sqr(1000.0), options.angle_threshold);
        assert_eq!(kept, run);
    }

    #[test]
    fn corners_are_kept() {
        let run = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(1.0, 2.0)];
        let kept = decimate(&run, 1e6, PI / 18.0);
        assert_eq!(kept, vec![run[0], run[1], run[2], run[3]]);
    }

    #[test]
    fn short_runs_are_lines() {
        let data = [p(0.0, 0.0), PathPoint::separator(), p(1.0, 1.0), p(2.0, 2.0)];
        let out = smooth(&data, 0, 0.0, &SmoothingOptions::default());

        assert_eq!(out.len(), 5);
        assert_eq!(out[0], p(0.0, 0.0).with_type(SegmentType::MoveTo));
        assert_eq!(out[1], p(0.0, 0.0));
        assert!(!out[2].is_defined());
        assert_eq!(out[3], p(1.0, 1.0).with_type(SegmentType::MoveTo));
        assert_eq!(out[4], p(2.0, 2.0));
    }

    #[test]
    fn curves_have_two_control_points() {
        let data = (0..8)
            .map(|i| p(i as f64, if i % 2 == 0 { 0.0 } else { 0.5 }))
            .collect::<Vec<_>>();
        let out = smooth(&data, 0, 0.0, &SmoothingOptions::default());
        assert_well_formed(&out);

        let endpoints = out.iter()
            .filter(|point| point.segment_type != SegmentType::Control)
            .count();
        assert_eq!(endpoints, data.len());
        assert_eq!(out[0].segment_type, SegmentType::MoveTo);
        assert!(out.iter().any(|point| point.segment_type == SegmentType::CurveTo));
    }

    #[test]
    fn smooth_arc() {
        let data = (0..6)
            .map(|i| {
                let t = i as f64 * PI / 10.0;
                p(t.cos(), t.sin())
            })
            .collect::<Vec<_>>();
        let out = smooth(&data, 0, 0.0, &SmoothingOptions::default());
        assert_well_formed(&out);

        let mut expected = vec![SegmentType::MoveTo];
        for _ in 1..data.len() {
            expected.extend([SegmentType::Control, SegmentType::Control, SegmentType::CurveTo]);
        }
        assert_eq!(types(&out), expected);
    }

    #[test]
    fn single_point_run_with_decimation() {
        let data = [p(0.0, 0.0), PathPoint::separator(), p(1.0, 1.0), p(2.0, 2.0)];
        let out = smooth(&data, 0, 1.0, &SmoothingOptions::default());

        assert_eq!(types(&out), vec![
            SegmentType::MoveTo,
            SegmentType::LineTo,
            SegmentType::LineTo,
            SegmentType::MoveTo,
            SegmentType::LineTo,
        ]);
        assert_eq!(out[0], p(0.0, 0.0).with_type(SegmentType::MoveTo));
        assert_eq!(out[1], p(0.0, 0.0));
        assert!(!out[2].is_defined());
        assert_eq!(out[4], p(2.0, 2.0));
        assert!(out.iter().all(|point| point.segment_type != SegmentType::Control));
    }

    #[test]
    fn runs_of_mixed_length_with_decimation() {
        let mut data = vec![
            p(0.0, 0.0).with_type(SegmentType::MoveTo),
            p(5.0, 5.0).with_type(SegmentType::MoveTo),
            p(6.0, 5.0),
        ];
        data.extend((0..6).map(|i| {
            let t = i as f64 * PI / 10.0;
            let point = p(10.0 + 3.0 * t.cos(), 3.0 * t.sin());
            if i == 0 { point.with_type(SegmentType::MoveTo) } else { point }
        }));

        let out = smooth(&data, 0, 1000.0, &SmoothingOptions::default());
        assert_well_formed(&out);

        let mut expected = vec![
            SegmentType::MoveTo,
            SegmentType::LineTo,
            SegmentType::LineTo,
            SegmentType::MoveTo,
            SegmentType::LineTo,
            SegmentType::LineTo,
            SegmentType::MoveTo,
        ];
        for _ in 1..6 {
            expected.extend([SegmentType::Control, SegmentType::Control, SegmentType::CurveTo]);
        }
        assert_eq!(types(&out), expected);

        let count = |kind: SegmentType| out.iter().filter(|point| point.segment_type == kind).count();
        assert_eq!(count(SegmentType::CurveTo), 5);
        assert_eq!(count(SegmentType::Control), 10);

        let separators = out.iter()
            .enumerate()
            .filter(|(_, point)| !point.is_defined())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        assert_eq!(separators, vec![2, 5]);
        assert!(out[2].x.is_nan() && out[5].y.is_nan());
        assert_eq!(out[1], p(0.0, 0.0));
        assert_eq!(out[4], p(6.0, 5.0));
        assert_eq!(out[6], p(13.0, 0.0).with_type(SegmentType::MoveTo));
    }

    #[test]
    fn move_to_starts_new_run() {
        let data = [
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(5.0, 5.0).with_type(SegmentType::MoveTo),
            p(6.0, 5.0),
        ];
        let out = smooth(&data, 0, 0.0, &SmoothingOptions::default());

        assert_eq!(out.len(), 5);
        assert_eq!(types(&out), vec![
            SegmentType::MoveTo,
            SegmentType::LineTo,
            SegmentType::LineTo,
            SegmentType::MoveTo,
            SegmentType::LineTo,
        ]);
        assert!(!out[2].is_defined());
        assert_eq!((out[3].x, out[3].y), (5.0, 5.0));
    }

    #[test]
    fn prefix_is_copied() {
        let prefix = [
            p(-2.0, 0.0).with_type(SegmentType::MoveTo),
            p(-1.0, 0.0).with_type(SegmentType::Control),
        ];
        let mut data = prefix.to_vec();
        data.extend([p(0.0, 0.0), p(1.0, 1.0)]);

        let out = smooth(&data, prefix.len(), 0.0, &SmoothingOptions::default());
        assert_eq!(&out[..2], &prefix);
        assert!(!out[2].is_defined());
        assert_eq!(out[3], p(0.0, 0.0).with_type(SegmentType::MoveTo));
        assert_eq!(out[4], p(1.0, 1.0));
    }

    #[test]
    fn polyline_fallback() {
        let data = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0)];
        let out = smooth(&data, 0, 0.0, &SmoothingOptions::default().smoothing(false));
        assert_eq!(types(&out), vec![SegmentType::MoveTo, SegmentType::LineTo, SegmentType::LineTo]);

        // no two consecutive defined points
        let data = [p(0.0, 0.0), PathPoint::separator(), p(2.0, 0.0)];
        let out = smooth(&data, 0, 0.0, &SmoothingOptions::default());
        assert_eq!(types(&out), vec![SegmentType::MoveTo, SegmentType::LineTo, SegmentType::LineTo]);
        assert!(!out[1].is_defined());

        assert!(smooth(&[], 0, 1.0, &SmoothingOptions::default()).is_empty());
    }
}
