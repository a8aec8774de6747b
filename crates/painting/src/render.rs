//! Stamp rendering of fitted curves
//!
//! A variable-width stroke is approximated with fill primitives only: every
//! curve becomes a run of filled discs whose radius follows the curve's
//! widths, merged into one [`FillPath`] so overlapping discs blend into a
//! single tapered shape.

use inkpad_config::{PadConfig, PressureOptions};
use tracing::{debug, trace};

use crate::brush::PressureResponse;
use crate::color::{ColorModulator, Rgb};
use crate::constants::STAMPS_PER_PIXEL;
use crate::curve::{Curve, Point};
use crate::fitter::CurveFitter;
use crate::types::{Sample, Stroke};

/// A filled disc stamped along a stroke
///
/// Plain `f32` layout so batches can be uploaded to the GPU as-is.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Disc {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Discs of one curve or dot, filled together in a single color
#[derive(Debug, Clone, PartialEq)]
pub struct FillPath {
    pub color: Rgb,
    pub discs: Vec<Disc>,
}

impl FillPath {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.discs)
    }
}

/// Host drawing surface that accepts fill paths
pub trait DrawSurface {
    /// Fill every disc of `path`
    fn fill(&mut self, path: &FillPath);

    /// Erase everything drawn so far
    fn clear(&mut self);
}

/// Collects fill paths instead of drawing them
impl DrawSurface for Vec<FillPath> {
    fn fill(&mut self, path: &FillPath) {
        self.push(path.clone());
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Receiver of the geometry produced by replaying or drawing strokes
pub trait StrokeSink {
    /// A fitted segment of a multi-point stroke
    fn on_curve(&mut self, curve: &Curve, stroke: &Stroke);

    /// A stroke consisting of a single sample
    fn on_dot(&mut self, sample: &Sample, stroke: &Stroke);
}

/// Regenerate every curve and dot of `strokes`, in drawing order
///
/// Each stroke gets a fresh fitter configured from `config`. Strokes with two
/// points fit no curve and produce nothing; empty strokes are skipped.
pub fn replay<'a, K>(strokes: impl IntoIterator<Item = &'a Stroke>, config: &PadConfig, sink: &mut K)
where
    K: StrokeSink + ?Sized,
{
    for stroke in strokes {
        match stroke.points.as_slice() {
            [] => trace!("replay: skipping empty stroke"),
            [sample] => sink.on_dot(sample, stroke),
            samples => {
                let mut fitter = CurveFitter::for_stroke(stroke, config);
                for sample in samples {
                    if let Some(curve) = fitter.add_point(Point::from(sample)) {
                        sink.on_curve(&curve, stroke);
                    }
                }
            }
        }
    }
}

/// Live renderer stamping curves and dots onto a [`DrawSurface`]
pub struct StampRenderer<'a, S: DrawSurface + ?Sized> {
    surface: &'a mut S,
    colors: ColorModulator,
    pressure: PressureResponse,
}

impl<'a, S: DrawSurface + ?Sized> StampRenderer<'a, S> {
    pub fn new(surface: &'a mut S, options: &PressureOptions) -> Self {
        Self {
            surface,
            colors: ColorModulator::new(options),
            pressure: PressureResponse::new(options),
        }
    }

    /// Discs approximating `curve`, two per unit of arc length
    pub fn stamp_curve(&self, curve: &Curve, stroke: &Stroke) -> Vec<Disc> {
        // NaN lengths saturate to zero steps
        let steps = curve.length().ceil() as usize * STAMPS_PER_PIXEL;
        let max_width = stroke.style.max_width;
        let pressure = curve.end_point.pressure;

        (0..steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                let pos = curve.point_at(t);
                let width = curve.width_at(t).min(max_width);
                let radius = self.pressure.widen(width, pressure, stroke.pointer_type);

                Disc {
                    x: pos.x as f32,
                    y: pos.y as f32,
                    radius: radius as f32,
                }
            })
            .collect()
    }

    /// The single disc drawn for a one-point stroke
    pub fn stamp_dot(&self, sample: &Sample, stroke: &Stroke) -> Disc {
        let radius =
            self.pressure
                .widen(stroke.style.dot_radius(), sample.pressure, stroke.pointer_type);

        Disc {
            x: sample.x as f32,
            y: sample.y as f32,
            radius: radius as f32,
        }
    }
}

impl<S: DrawSurface + ?Sized> StrokeSink for StampRenderer<'_, S> {
    fn on_curve(&mut self, curve: &Curve, stroke: &Stroke) {
        let discs = self.stamp_curve(curve, stroke);
        if discs.is_empty() {
            debug!("StampRenderer: curve produced no stamps");
            return;
        }

        let color = self.colors.color_for(
            stroke.style.pen_color,
            curve.end_point.pressure,
            stroke.pointer_type,
        );
        trace!("StampRenderer: {} stamps, color {}", discs.len(), color);
        self.surface.fill(&FillPath { color, discs });
    }

    fn on_dot(&mut self, sample: &Sample, stroke: &Stroke) {
        let color = self
            .colors
            .color_for(stroke.style.pen_color, sample.pressure, stroke.pointer_type);
        let disc = self.stamp_dot(sample, stroke);
        trace!(
            "StampRenderer: dot at ({:.1}, {:.1}), radius {:.2}",
            disc.x, disc.y, disc.radius
        );
        self.surface.fill(&FillPath {
            color,
            discs: vec![disc],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveWidths;
    use crate::types::{PointerKind, StrokeStyle};

    fn stroke(pointer: PointerKind, points: Vec<Sample>) -> Stroke {
        Stroke::with_points(StrokeStyle::default(), pointer, points)
    }

    fn straight_curve(start_width: f64, end_width: f64, pressure: f64) -> Curve {
        let points = [0.0, 10.0, 20.0, 30.0].map(|x| Point::new(x, 0.0, pressure, 0));
        Curve::from_points(
            &points,
            CurveWidths {
                start: start_width,
                end: end_width,
            },
        )
    }

    #[derive(Default)]
    struct Counter {
        curves: usize,
        dots: usize,
    }

    impl StrokeSink for Counter {
        fn on_curve(&mut self, _curve: &Curve, _stroke: &Stroke) {
            self.curves += 1;
        }

        fn on_dot(&mut self, _sample: &Sample, _stroke: &Stroke) {
            self.dots += 1;
        }
    }

    fn line_samples(n: u64) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample::new(i as f64 * 10.0, (i % 3) as f64, 0.5, i * 16))
            .collect()
    }

    #[test]
    fn test_stamp_count_follows_length() {
        let mut surface: Vec<FillPath> = Vec::new();
        let renderer = StampRenderer::new(&mut surface, &PressureOptions::disabled());
        let curve = straight_curve(1.0, 2.0, 0.5);

        let discs = renderer.stamp_curve(&curve, &stroke(PointerKind::Mouse, vec![]));
        assert_eq!(discs.len(), curve.length().ceil() as usize * 2);
        assert!(discs.len() >= 20);
        assert_eq!(discs[0].x, 10.0);
        assert_eq!(discs[0].radius, 1.0);
    }

    #[test]
    fn test_stamp_radius_clamped_to_max_width() {
        let mut surface: Vec<FillPath> = Vec::new();
        let renderer = StampRenderer::new(&mut surface, &PressureOptions::disabled());
        let curve = straight_curve(2.0, 4.0, 0.5);

        let discs = renderer.stamp_curve(&curve, &stroke(PointerKind::Mouse, vec![]));
        assert!(discs.iter().all(|d| d.radius <= 2.5));
        assert_eq!(discs.last().unwrap().radius, 2.5);
    }

    #[test]
    fn test_stylus_pressure_widens_past_max_width() {
        let mut surface: Vec<FillPath> = Vec::new();
        let options = PressureOptions {
            multiplier: 2.0,
            ..Default::default()
        };
        let renderer = StampRenderer::new(&mut surface, &options);
        let curve = straight_curve(2.5, 2.5, 0.5);

        let pen = renderer.stamp_curve(&curve, &stroke(PointerKind::Pen, vec![]));
        assert!(pen.iter().all(|d| (d.radius - 3.5).abs() < 1e-6));

        let mouse = renderer.stamp_curve(&curve, &stroke(PointerKind::Mouse, vec![]));
        assert!(mouse.iter().all(|d| (d.radius - 2.5).abs() < 1e-6));
    }

    #[test]
    fn test_non_finite_curve_draws_nothing() {
        let mut surface: Vec<FillPath> = Vec::new();
        let points = [Point::new(1.0, 1.0, 0.5, 0); 4];
        let curve = Curve::from_points(&points, CurveWidths { start: 1.0, end: 1.0 });

        let mut renderer = StampRenderer::new(&mut surface, &PressureOptions::disabled());
        renderer.on_curve(&curve, &stroke(PointerKind::Mouse, vec![]));
        assert!(surface.is_empty());
    }

    #[test]
    fn test_dot_radius_and_fill() {
        let mut surface: Vec<FillPath> = Vec::new();
        let sample = Sample::new(5.0, 6.0, 0.5, 0);
        let dot = stroke(PointerKind::Mouse, vec![sample]);

        StampRenderer::new(&mut surface, &PressureOptions::default()).on_dot(&sample, &dot);

        assert_eq!(surface.len(), 1);
        assert_eq!(surface[0].color, Rgb::BLACK);
        assert_eq!(
            surface[0].discs,
            vec![Disc {
                x: 5.0,
                y: 6.0,
                radius: 1.5
            }]
        );
        assert_eq!(surface[0].as_bytes().len(), 12);
    }

    #[test]
    fn test_replay_counts() {
        let strokes = vec![
            stroke(PointerKind::Mouse, line_samples(1)),
            stroke(PointerKind::Mouse, line_samples(2)),
            stroke(PointerKind::Mouse, line_samples(6)),
            stroke(PointerKind::Mouse, vec![]),
        ];

        let mut counter = Counter::default();
        replay(&strokes, &PadConfig::default(), &mut counter);

        assert_eq!(counter.dots, 1);
        assert_eq!(counter.curves, 4);
    }

    #[test]
    fn test_replay_into_renderer_fills_one_path_per_curve() {
        let strokes = vec![stroke(PointerKind::Mouse, line_samples(5))];
        let mut surface: Vec<FillPath> = Vec::new();

        let mut renderer = StampRenderer::new(&mut surface, &PressureOptions::default());
        replay(&strokes, &PadConfig::default(), &mut renderer);

        assert_eq!(surface.len(), 3);
        assert!(surface.iter().all(|path| !path.discs.is_empty()));
    }
}
