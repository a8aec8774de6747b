//! Inkpad painting system - smooth variable-width signature strokes
//!
//! This crate turns raw pointer samples into smooth strokes and exports them:
//! - [`types::Stroke`] - A recorded stroke with its style and samples
//! - [`curve::Curve`] - A cubic Bézier segment with start and end widths
//! - [`brush`] - Point filter, velocity width model and pressure response
//! - [`fitter`] - Four-point sliding window fitting curves to samples
//! - [`color`] - Pen colors and pressure-driven luminance shifts
//! - [`render`] - Disc stamping onto a host drawing surface
//! - [`surface`] - CPU RGBA surface implementing the drawing surface
//! - [`validation`] - Checks applied to imported stroke documents
//! - [`export`] - SVG and biometric serializers
//! - [`pipeline`] - The pad session tying it all together

pub mod brush;
pub mod color;
pub mod constants;
pub mod curve;
pub mod export;
pub mod fitter;
pub mod pipeline;
pub mod render;
pub mod surface;
pub mod types;
pub mod validation;

pub use brush::*;
pub use color::*;
pub use constants::*;
pub use curve::*;
pub use export::{BiometricDocument, ExportError, SamplePoint};
pub use fitter::*;
pub use pipeline::*;
pub use render::*;
pub use surface::*;
pub use types::*;
pub use validation::*;

pub use inkpad_config::{ConfigError, PadConfig, PressureOptions, StrokeOptions, SurfaceConfig};
