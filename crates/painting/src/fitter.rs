//! Incremental curve fitting over a sliding window of points

use inkpad_config::PadConfig;

use crate::brush::WidthModel;
use crate::constants::WINDOW_SIZE;
use crate::curve::{Curve, Point};
use crate::types::{Stroke, StrokeStyle};

/// Fixed-capacity ring of the most recent points, oldest first
#[derive(Debug, Clone, Default)]
pub struct PointWindow {
    slots: [Point; WINDOW_SIZE],
    /// Slot holding the oldest point
    head: usize,
    len: usize,
}

impl PointWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == WINDOW_SIZE
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Point at position `index`, 0 being the oldest
    pub fn get(&self, index: usize) -> Option<&Point> {
        (index < self.len).then(|| &self.slots[(self.head + index) % WINDOW_SIZE])
    }

    /// Append a point, overwriting the oldest one when full
    pub fn push_back(&mut self, point: Point) {
        if self.is_full() {
            self.slots[self.head] = point;
            self.head = (self.head + 1) % WINDOW_SIZE;
        } else {
            self.slots[(self.head + self.len) % WINDOW_SIZE] = point;
            self.len += 1;
        }
    }

    /// Insert a point before the oldest one; ignored when full
    pub fn push_front(&mut self, point: Point) {
        if self.is_full() {
            return;
        }
        self.head = (self.head + WINDOW_SIZE - 1) % WINDOW_SIZE;
        self.slots[self.head] = point;
        self.len += 1;
    }

    pub fn pop_front(&mut self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        let point = self.slots[self.head];
        self.head = (self.head + 1) % WINDOW_SIZE;
        self.len -= 1;
        Some(point)
    }

    /// Contents oldest first, only when full
    pub fn to_array(&self) -> Option<[Point; WINDOW_SIZE]> {
        self.is_full()
            .then(|| std::array::from_fn(|i| self.slots[(self.head + i) % WINDOW_SIZE]))
    }
}

/// Turns accepted points into curves, one per point once three are buffered
///
/// When the third point arrives the first one is duplicated, so the first
/// curve is emitted without waiting for a fourth point.
#[derive(Debug, Clone)]
pub struct CurveFitter {
    window: PointWindow,
    widths: WidthModel,
}

impl CurveFitter {
    pub fn new(style: &StrokeStyle, velocity_filter_weight: f64) -> Self {
        Self {
            window: PointWindow::new(),
            widths: WidthModel::new(style, velocity_filter_weight),
        }
    }

    /// Fitter for `stroke`, widening stylus input per `config`
    pub fn for_stroke(stroke: &Stroke, config: &PadConfig) -> Self {
        Self {
            window: PointWindow::new(),
            widths: WidthModel::for_stroke(stroke, config),
        }
    }

    /// Drop buffered points and return to the stroke-start width
    pub fn reset(&mut self) {
        self.window.clear();
        self.widths.reset();
    }

    pub fn width_model(&self) -> &WidthModel {
        &self.widths
    }

    /// Number of points currently buffered
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    /// Add an accepted point, returning the curve it completes, if any
    pub fn add_point(&mut self, point: Point) -> Option<Curve> {
        self.window.push_back(point);

        if self.window.len() == WINDOW_SIZE - 1 {
            let first = *self.window.get(0)?;
            self.window.push_front(first);
        }

        let points = self.window.to_array()?;
        let widths = self.widths.advance(&points[1], &points[2]);
        let curve = Curve::from_points(&points, widths);
        self.window.pop_front();

        Some(curve)
    }
}
