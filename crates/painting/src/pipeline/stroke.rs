//! Stroke handling for the pad session

use tracing::debug;

use crate::brush::PointFilter;
use crate::curve::Point;
use crate::fitter::CurveFitter;
use crate::render::{DrawSurface, StampRenderer, StrokeSink};
use crate::types::{PointerInput, Stroke};

use super::SignaturePad;

impl<S: DrawSurface> SignaturePad<S> {
    /// Begin a stroke at `input`
    ///
    /// The current pen color and options are snapshotted into the new stroke
    /// and its fitter. A stroke still in progress is ended first.
    pub fn begin_stroke(&mut self, input: PointerInput) {
        if self.stroking {
            debug!("begin_stroke: previous stroke still active, ending it");
            self.end_stroke();
        }

        let stroke = Stroke::new(self.style(), input.pointer);
        self.fitter = CurveFitter::for_stroke(&stroke, &self.config);
        self.document.push(stroke);
        self.stroking = true;

        self.stroke_to(input);
    }

    /// Continue the active stroke with a new sample
    ///
    /// Samples within `min_distance` of the last accepted one are dropped.
    pub fn stroke_to(&mut self, input: PointerInput) {
        if !self.stroking {
            debug!("stroke_to: no active stroke, ignoring");
            return;
        }
        let Some(stroke) = self.document.active_stroke_mut() else {
            return;
        };

        let sample = input.sample();
        let last = stroke.points.last().copied();
        let filter = PointFilter::new(self.config.stroke.min_distance);
        if !filter.accepts(last.as_ref(), &sample) {
            return;
        }

        let curve = self.fitter.add_point(Point::from(sample));
        stroke.points.push(sample);

        let mut renderer = StampRenderer::new(&mut self.surface, &self.config.pressure);
        match (last, curve) {
            (None, _) => renderer.on_dot(&sample, stroke),
            (Some(_), Some(curve)) => renderer.on_curve(&curve, stroke),
            (Some(_), None) => {}
        }
    }

    /// End the current stroke
    pub fn end_stroke(&mut self) {
        if !self.stroking {
            return;
        }
        self.stroking = false;

        if let Some(stroke) = self.document.strokes().last() {
            debug!(
                "end_stroke: {} points, {} strokes total",
                stroke.points.len(),
                self.document.len()
            );
        }
    }

    /// Discard every stroke and the active window, and clear the surface
    pub fn clear(&mut self) {
        self.document.clear();
        self.fitter.reset();
        self.stroking = false;
        self.surface.clear();
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        self.stroking
    }
}
