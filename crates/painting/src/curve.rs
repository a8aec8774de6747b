//! Cubic Bézier segments fitted through pointer samples

use glam::DVec2;

use crate::constants::{ARC_LENGTH_STEPS, MIN_ELAPSED_MS};
use crate::types::Sample;

/// A positioned, pressure-bearing point as seen by the curve fitter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub pos: DVec2,
    pub pressure: f64,
    /// Timestamp in milliseconds
    pub time: u64,
}

impl Point {
    pub fn new(x: f64, y: f64, pressure: f64, time: u64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            pressure,
            time,
        }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        self.pos.distance(other.pos)
    }

    /// Speed in pixels per millisecond travelled from `start` to `self`
    pub fn velocity_from(&self, start: &Point) -> f64 {
        let elapsed = self.time.saturating_sub(start.time) as f64;
        self.distance_to(start) / elapsed.max(MIN_ELAPSED_MS)
    }
}

impl From<Sample> for Point {
    fn from(sample: Sample) -> Self {
        Point::new(sample.x, sample.y, sample.pressure, sample.time)
    }
}

impl From<&Sample> for Point {
    fn from(sample: &Sample) -> Self {
        Point::from(*sample)
    }
}

/// Widths at both ends of a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveWidths {
    pub start: f64,
    pub end: f64,
}

/// One cubic segment of a stroke with a width at each end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub start_point: Point,
    pub control1: DVec2,
    pub control2: DVec2,
    pub end_point: Point,
    pub start_width: f64,
    pub end_width: f64,
}

impl Curve {
    /// Fit the segment between `points[1]` and `points[2]`
    ///
    /// The outer points only steer the tangents, so consecutive segments
    /// join with matching tangents.
    pub fn from_points(points: &[Point; 4], widths: CurveWidths) -> Self {
        let (_, control1) = control_points(points[0].pos, points[1].pos, points[2].pos);
        let (control2, _) = control_points(points[1].pos, points[2].pos, points[3].pos);

        Self {
            start_point: points[1],
            control1,
            control2,
            end_point: points[2],
            start_width: widths.start,
            end_width: widths.end,
        }
    }

    /// Position at parameter `t` in 0.0-1.0
    pub fn point_at(&self, t: f64) -> DVec2 {
        let u = 1.0 - t;
        let tt = t * t;
        let uu = u * u;

        self.start_point.pos * (uu * u)
            + self.control1 * (3.0 * uu * t)
            + self.control2 * (3.0 * u * tt)
            + self.end_point.pos * (tt * t)
    }

    /// Width at parameter `t`, interpolated along the `t³` term
    pub fn width_at(&self, t: f64) -> f64 {
        self.start_width + t * t * t * (self.end_width - self.start_width)
    }

    /// Arc length approximated by a polyline through the curve
    pub fn length(&self) -> f64 {
        let mut length = 0.0;
        let mut previous = self.start_point.pos;

        for i in 1..=ARC_LENGTH_STEPS {
            let current = self.point_at(i as f64 / ARC_LENGTH_STEPS as f64);
            length += current.distance(previous);
            previous = current;
        }

        length
    }

    /// Whether both control points are finite numbers
    ///
    /// Coincident input points produce NaN control points.
    pub fn is_finite(&self) -> bool {
        self.control1.is_finite() && self.control2.is_finite()
    }
}

/// Control points on either side of `s2` for the spline through `s1, s2, s3`
///
/// The tangent at `s2` is parallel to `s3 - s1`; the two handles split it in
/// proportion to the lengths of the adjacent chords.
fn control_points(s1: DVec2, s2: DVec2, s3: DVec2) -> (DVec2, DVec2) {
    let m1 = (s1 + s2) / 2.0;
    let m2 = (s2 + s3) / 2.0;

    let l1 = s1.distance(s2);
    let l2 = s2.distance(s3);

    let k = l2 / (l1 + l2);
    let cm = m2 + (m1 - m2) * k;
    let shift = s2 - cm;

    (m1 + shift, m2 + shift)
}
