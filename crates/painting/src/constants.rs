/// Points held by the curve fitter's sliding window.
pub const WINDOW_SIZE: usize = 4;

/// Polyline segments used to approximate a curve's arc length.
pub const ARC_LENGTH_STEPS: usize = 10;

/// Stamps per unit of arc length (doubling avoids gaps between discs).
pub const STAMPS_PER_PIXEL: usize = 2;

/// Floor for the elapsed time between two points, in milliseconds.
pub const MIN_ELAPSED_MS: f64 = 1.0;

/// SVG stroke width per unit of curve end width.
pub const SVG_STROKE_SCALE: f64 = 2.25;

/// Decimal digits for SVG path coordinates and widths.
pub const SVG_PRECISION: usize = 3;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// CSS reference resolution in pixels per inch.
pub const CSS_PIXELS_PER_INCH: f64 = 96.0;

/// Full scale of the 16-bit pressure channel.
pub const PRESSURE_FULL_SCALE: f64 = 65535.0;
