//! Pad session tying the painting pieces together
//!
//! This module provides the session object that connects:
//! - Input handling (samples from the host's pointer binding)
//! - Point filter, width model and curve fitter
//! - Stamp rendering onto the host's drawing surface
//! - The stroke document and its exporters
//!
//! All state lives in [`SignaturePad`]; a host that throttles input simply
//! forwards the samples it keeps to the same session.

mod document;
mod stroke;

use inkpad_config::{ConfigError, PadConfig, PressureOptions, StrokeOptions};

use crate::color::Rgb;
use crate::fitter::CurveFitter;
use crate::render::DrawSurface;
use crate::types::{StrokeDocument, StrokeStyle};

pub use document::FromDataOptions;

/// Drawing session for one pad
///
/// This struct manages the full workflow:
/// 1. Input comes in via `begin_stroke`, `stroke_to`, `end_stroke`
/// 2. Accepted samples are fitted into curves
/// 3. Curves are stamped onto the surface
/// 4. Samples are recorded in the stroke document for export
pub struct SignaturePad<S: DrawSurface> {
    /// Host drawing surface
    pub(crate) surface: S,
    pub(crate) config: PadConfig,
    /// Color for strokes started from now on
    pub(crate) pen_color: Rgb,
    pub(crate) document: StrokeDocument,
    /// Sliding window and width state of the active stroke
    pub(crate) fitter: CurveFitter,
    /// Whether a stroke is accepting samples
    pub(crate) stroking: bool,
}

impl<S: DrawSurface> SignaturePad<S> {
    /// Create a new pad drawing onto `surface`
    pub fn new(surface: S, config: PadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pen_color = Rgb::BLACK;
        let style = current_style(&config.stroke, pen_color);
        let fitter = CurveFitter::new(&style, config.stroke.velocity_filter_weight);

        Ok(Self {
            surface,
            config,
            pen_color,
            document: StrokeDocument::new(),
            fitter,
            stroking: false,
        })
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    /// Replace the stroke options; takes effect with the next stroke
    pub fn set_stroke_options(&mut self, options: StrokeOptions) -> Result<(), ConfigError> {
        options.validate()?;
        self.config.stroke = options;
        Ok(())
    }

    pub fn set_pressure_options(&mut self, options: PressureOptions) -> Result<(), ConfigError> {
        options.validate()?;
        self.config.pressure = options;
        Ok(())
    }

    /// Set the pen color; takes effect with the next stroke
    pub fn set_pen_color(&mut self, color: Rgb) {
        self.pen_color = color;
    }

    pub fn pen_color(&self) -> Rgb {
        self.pen_color
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Check if the pad holds no strokes
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Style a stroke started now would get
    pub(crate) fn style(&self) -> StrokeStyle {
        current_style(&self.config.stroke, self.pen_color)
    }
}

fn current_style(options: &StrokeOptions, pen_color: Rgb) -> StrokeStyle {
    StrokeStyle {
        pen_color,
        dot_size: options.dot_size,
        min_width: options.min_width,
        max_width: options.max_width,
    }
}
