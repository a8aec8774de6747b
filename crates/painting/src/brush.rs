//! Pen dynamics: sample filtering, velocity-driven width and pressure widening
//!
//! The width model turns the speed between fitted points into a stroke
//! width: fast movement thins the line towards `min_width`, slow movement
//! thickens it towards `max_width`. Stylus pressure is added on top and
//! carried into the next curve's start width.

use inkpad_config::{PadConfig, PressureOptions};
use tracing::trace;

use crate::curve::{CurveWidths, Point};
use crate::types::{PointerKind, Sample, Stroke, StrokeStyle};

/// Drops samples that are too close to the last accepted one
#[derive(Debug, Clone, Copy)]
pub struct PointFilter {
    min_distance: f64,
}

impl PointFilter {
    pub fn new(min_distance: f64) -> Self {
        Self { min_distance }
    }

    /// Whether `candidate` should be added after `last`
    ///
    /// The first sample of a stroke (`last == None`) is always accepted.
    pub fn accepts(&self, last: Option<&Sample>, candidate: &Sample) -> bool {
        let Some(last) = last else {
            return true;
        };

        let distance = candidate.distance_to(last);
        if distance <= self.min_distance {
            trace!(
                "PointFilter: rejected ({:.1}, {:.1}), {:.2} from last point",
                candidate.x, candidate.y, distance
            );
            return false;
        }
        true
    }
}

/// Exponentially smoothed velocity and the width derived from it
#[derive(Debug, Clone)]
pub struct WidthModel {
    velocity_filter_weight: f64,
    min_width: f64,
    max_width: f64,
    pressure: PressureResponse,
    pointer: PointerKind,
    last_velocity: f64,
    last_width: f64,
}

impl WidthModel {
    /// Model without pressure widening
    pub fn new(style: &StrokeStyle, velocity_filter_weight: f64) -> Self {
        Self {
            velocity_filter_weight,
            min_width: style.min_width,
            max_width: style.max_width,
            pressure: PressureResponse::new(&PressureOptions::disabled()),
            pointer: PointerKind::default(),
            last_velocity: 0.0,
            last_width: style.mid_width(),
        }
    }

    /// Model for `stroke` with the weight and pressure response of `config`
    pub fn for_stroke(stroke: &Stroke, config: &PadConfig) -> Self {
        Self::new(&stroke.style, config.stroke.velocity_filter_weight).with_pressure(
            PressureResponse::new(&config.pressure),
            stroke.pointer_type,
        )
    }

    /// Widen every width by the pressure of `pointer` input
    pub fn with_pressure(mut self, pressure: PressureResponse, pointer: PointerKind) -> Self {
        self.pressure = pressure;
        self.pointer = pointer;
        self
    }

    /// Return to the state at stroke start
    pub fn reset(&mut self) {
        self.last_velocity = 0.0;
        self.last_width = (self.min_width + self.max_width) / 2.0;
    }

    pub fn velocity_filter_weight(&self) -> f64 {
        self.velocity_filter_weight
    }

    pub fn last_velocity(&self) -> f64 {
        self.last_velocity
    }

    pub fn last_width(&self) -> f64 {
        self.last_width
    }

    /// Width for a smoothed velocity, clamped below by `min_width`
    ///
    /// The result never exceeds `max_width` for non-negative velocities.
    pub fn width_for_velocity(&self, velocity: f64) -> f64 {
        (self.max_width / (velocity + 1.0)).max(self.min_width)
    }

    /// Advance the model by the step from `start` to `end`
    ///
    /// Returns the widths of the curve covering that step: the previous width
    /// at its start and the new width at its end. For stylus input the new
    /// width includes `end.pressure * multiplier` and may exceed `max_width`.
    pub fn advance(&mut self, start: &Point, end: &Point) -> CurveWidths {
        let weight = self.velocity_filter_weight;
        let velocity = weight * end.velocity_from(start) + (1.0 - weight) * self.last_velocity;
        let width = self
            .pressure
            .widen(self.width_for_velocity(velocity), end.pressure, self.pointer);

        let widths = CurveWidths {
            start: self.last_width,
            end: width,
        };

        self.last_velocity = velocity;
        self.last_width = width;

        widths
    }
}

/// Pressure widening for stylus input
#[derive(Debug, Clone, Copy)]
pub struct PressureResponse {
    enabled: bool,
    multiplier: f64,
}

impl PressureResponse {
    pub fn new(options: &PressureOptions) -> Self {
        Self {
            enabled: options.width,
            multiplier: options.multiplier,
        }
    }

    /// Whether widening applies to input from `pointer`
    pub fn applies_to(&self, pointer: PointerKind) -> bool {
        self.enabled && pointer.is_stylus()
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Add `pressure * multiplier` to `width` for stylus input
    ///
    /// Not clamped; heavy pressure may push the width past `max_width`.
    pub fn widen(&self, width: f64, pressure: f64, pointer: PointerKind) -> f64 {
        if self.applies_to(pointer) {
            width + pressure * self.multiplier
        } else {
            width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> StrokeStyle {
        StrokeStyle {
            min_width: 0.5,
            max_width: 2.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_accepts_first_point() {
        let filter = PointFilter::new(5.0);
        assert!(filter.accepts(None, &Sample::new(0.0, 0.0, 0.5, 0)));
    }

    #[test]
    fn test_filter_rejects_close_points() {
        let filter = PointFilter::new(5.0);
        let last = Sample::new(0.0, 0.0, 0.5, 0);

        assert!(!filter.accepts(Some(&last), &Sample::new(0.0, 0.0, 0.5, 10)));
        // Exactly at the threshold is still too close
        assert!(!filter.accepts(Some(&last), &Sample::new(3.0, 4.0, 0.5, 10)));
        assert!(filter.accepts(Some(&last), &Sample::new(3.0, 4.1, 0.5, 10)));
    }

    #[test]
    fn test_width_model_starts_at_mid_width() {
        let model = WidthModel::new(&style(), 0.7);
        assert!((model.last_width() - 1.5).abs() < 1e-12);
        assert_eq!(model.last_velocity(), 0.0);
    }

    #[test]
    fn test_width_for_velocity_bounds() {
        let model = WidthModel::new(&style(), 0.7);
        assert!((model.width_for_velocity(0.0) - 2.5).abs() < 1e-12);
        assert!((model.width_for_velocity(1.5) - 1.0).abs() < 1e-12);
        assert!((model.width_for_velocity(1000.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_advance_smooths_velocity() {
        let mut model = WidthModel::new(&style(), 0.7);
        let a = Point::new(0.0, 0.0, 0.5, 0);
        let b = Point::new(10.0, 0.0, 0.5, 10);

        let widths = model.advance(&a, &b);
        // 0.7 * 1.0 + 0.3 * 0.0
        assert!((model.last_velocity() - 0.7).abs() < 1e-12);
        assert!((widths.start - 1.5).abs() < 1e-12);
        assert!((widths.end - 2.5 / 1.7).abs() < 1e-12);
        assert_eq!(widths.end, model.last_width());
    }

    #[test]
    fn test_constant_speed_converges() {
        let mut model = WidthModel::new(&style(), 0.7);
        let points: Vec<Point> = (0..12)
            .map(|i| Point::new(i as f64 * 10.0, 0.0, 0.5, i * 16))
            .collect();

        let widths: Vec<f64> = points
            .windows(2)
            .map(|pair| model.advance(&pair[0], &pair[1]).end)
            .collect();

        let speed = 10.0 / 16.0;
        let target = 2.5 / (speed + 1.0);
        for pair in widths.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12);
            assert!(pair[1] >= 0.5 && pair[1] <= 2.5);
        }
        assert!((widths.last().unwrap() - target).abs() < 1e-3);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let wide = StrokeStyle {
            min_width: 2.0,
            max_width: 6.0,
            ..Default::default()
        };
        let mut model = WidthModel::new(&wide, 0.7);
        model.advance(&Point::new(0.0, 0.0, 0.5, 0), &Point::new(50.0, 0.0, 0.5, 5));

        model.reset();
        assert_eq!(model.last_velocity(), 0.0);
        assert!((model.last_width() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_stylus_width_carries_pressure() {
        let response = PressureResponse::new(&PressureOptions::default());
        let mut model = WidthModel::new(&style(), 0.7).with_pressure(response, PointerKind::Pen);
        let a = Point::new(0.0, 0.0, 0.5, 0);
        let b = Point::new(10.0, 0.0, 0.5, 16);
        let c = Point::new(20.0, 0.0, 0.8, 32);

        let first = model.advance(&a, &b);
        let velocity = 0.7 * 10.0 / 16.0;
        assert!((first.start - 1.5).abs() < 1e-12);
        assert!((first.end - (2.5 / (velocity + 1.0) + 0.5)).abs() < 1e-12);
        assert_eq!(model.last_width(), first.end);

        // The widened width becomes the next curve's start
        let second = model.advance(&b, &c);
        assert_eq!(second.start, first.end);
        let velocity = 0.7 * 10.0 / 16.0 + 0.3 * velocity;
        assert!((second.end - (2.5 / (velocity + 1.0) + 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_mouse_width_ignores_pressure() {
        let response = PressureResponse::new(&PressureOptions::default());
        let mut model = WidthModel::new(&style(), 0.7).with_pressure(response, PointerKind::Mouse);
        let widths = model.advance(&Point::new(0.0, 0.0, 1.0, 0), &Point::new(10.0, 0.0, 1.0, 10));
        assert!((widths.end - 2.5 / 1.7).abs() < 1e-12);
    }

    #[test]
    fn test_for_stroke_uses_config() {
        let mut config = PadConfig::default();
        config.stroke.velocity_filter_weight = 1.0;
        config.pressure.multiplier = 3.0;
        let stroke = Stroke::new(style(), PointerKind::Pen);

        let mut model = WidthModel::for_stroke(&stroke, &config);
        assert_eq!(model.velocity_filter_weight(), 1.0);
        let widths = model.advance(&Point::new(0.0, 0.0, 0.5, 0), &Point::new(10.0, 0.0, 0.5, 10));
        assert!((widths.end - (2.5 / 2.0 + 1.5)).abs() < 1e-12);
    }

    #[test]
    fn test_pressure_widening_only_for_stylus() {
        let response = PressureResponse::new(&PressureOptions {
            multiplier: 2.0,
            ..Default::default()
        });

        assert!((response.widen(2.5, 0.5, PointerKind::Pen) - 3.5).abs() < 1e-12);
        assert_eq!(response.widen(2.5, 0.5, PointerKind::Mouse), 2.5);

        let disabled = PressureResponse::new(&PressureOptions::disabled());
        assert_eq!(disabled.widen(2.5, 0.5, PointerKind::Pen), 2.5);
    }
}
