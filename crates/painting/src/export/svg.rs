//! SVG export of stroke documents.
//!
//! Every fitted curve becomes one `<path>` with a single cubic command and a
//! stroke width taken from the curve's end width; single-point strokes become
//! `<circle>` markers. Path data is built as raw `d` strings so coordinates
//! keep exactly three decimals.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use inkpad_config::PadConfig;
use svg::Document;
use svg::Node;
use svg::node::element::{Circle, Path};
use tracing::debug;

use crate::brush::PressureResponse;
use crate::color::ColorModulator;
use crate::constants::{SVG_PRECISION, SVG_STROKE_SCALE};
use crate::curve::Curve;
use crate::render::{StrokeSink, replay};
use crate::types::{Sample, Stroke, StrokeDocument};

/// Digits of the exact expansion inspected for a rounding tie
const TIE_DIGITS: usize = 30;

/// Fixed-point formatting; negative zero prints as zero
///
/// Exact ties round away from zero (`1.0625` gives `1.063`), where `{:.3}`
/// alone would round to even.
fn fmt_fixed(value: f64) -> String {
    let value = value + 0.0;
    let exact = format!("{:.*}", TIE_DIGITS, value.abs());
    let Some((int, frac)) = exact.split_once('.') else {
        return format!("{:.*}", SVG_PRECISION, value);
    };
    let (kept, rest) = frac.split_at(SVG_PRECISION);
    let is_tie = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{:.*}", SVG_PRECISION, value);
    }

    let mut digits = format!("{int}{kept}").into_bytes();
    let mut i = digits.len();
    loop {
        if i == 0 {
            digits.insert(0, b'1');
            break;
        }
        i -= 1;
        if digits[i] == b'9' {
            digits[i] = b'0';
        } else {
            digits[i] += 1;
            break;
        }
    }

    let (int, frac) = digits.split_at(digits.len() - SVG_PRECISION);
    let sign = if value < 0.0 { "-" } else { "" };
    format!(
        "{sign}{}.{}",
        String::from_utf8_lossy(int),
        String::from_utf8_lossy(frac)
    )
}

/// Path data for one curve: `M start C control1 control2 end`
pub fn curve_path_data(curve: &Curve) -> String {
    let start = curve.start_point.pos;
    let end = curve.end_point.pos;
    format!(
        "M {},{} C {},{} {},{} {},{}",
        fmt_fixed(start.x),
        fmt_fixed(start.y),
        fmt_fixed(curve.control1.x),
        fmt_fixed(curve.control1.y),
        fmt_fixed(curve.control2.x),
        fmt_fixed(curve.control2.y),
        fmt_fixed(end.x),
        fmt_fixed(end.y),
    )
}

/// Stroke sink that appends SVG elements to a document
pub struct SvgExporter {
    document: Document,
    colors: ColorModulator,
    pressure: PressureResponse,
    skipped: usize,
}

impl SvgExporter {
    /// Empty document sized to the drawing surface
    pub fn new(config: &PadConfig) -> Self {
        let surface = &config.surface;
        let document = Document::new()
            .set("xmlns", "http://www.w3.org/2000/svg")
            .set(
                "viewBox",
                format!("0 0 {} {}", surface.logical_width(), surface.logical_height()),
            )
            .set("width", surface.width)
            .set("height", surface.height);

        Self {
            document,
            colors: ColorModulator::new(&config.pressure),
            pressure: PressureResponse::new(&config.pressure),
            skipped: 0,
        }
    }

    /// Number of curves dropped for non-finite geometry
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> Document {
        self.document
    }

    fn stroke_width(&self, curve: &Curve, stroke: &Stroke) -> f64 {
        let width = curve.end_width * SVG_STROKE_SCALE;
        if self.pressure.applies_to(stroke.pointer_type) {
            width * self.pressure.multiplier() * curve.end_point.pressure
        } else {
            width
        }
    }
}

impl StrokeSink for SvgExporter {
    fn on_curve(&mut self, curve: &Curve, stroke: &Stroke) {
        if !curve.is_finite() {
            debug!(
                "SvgExporter: skipping curve with non-finite control points ending at ({:.1}, {:.1})",
                curve.end_point.pos.x, curve.end_point.pos.y
            );
            self.skipped += 1;
            return;
        }

        let color = self.colors.color_for(
            stroke.style.pen_color,
            curve.end_point.pressure,
            stroke.pointer_type,
        );
        let path = Path::new()
            .set("d", curve_path_data(curve))
            .set("stroke-width", fmt_fixed(self.stroke_width(curve, stroke)))
            .set("stroke", color.to_string())
            .set("fill", "none")
            .set("stroke-linecap", "round");

        self.document.append(path);
    }

    fn on_dot(&mut self, sample: &Sample, stroke: &Stroke) {
        let color = self
            .colors
            .color_for(stroke.style.pen_color, sample.pressure, stroke.pointer_type);
        let circle = Circle::new()
            .set("r", stroke.style.dot_radius())
            .set("cx", sample.x)
            .set("cy", sample.y)
            .set("fill", color.to_string());

        self.document.append(circle);
    }
}

/// Render a stroke document to an SVG [`Document`].
#[must_use]
pub fn render_svg(document: &StrokeDocument, config: &PadConfig) -> Document {
    let mut exporter = SvgExporter::new(config);
    replay(document.strokes(), config, &mut exporter);
    if exporter.skipped() > 0 {
        debug!("render_svg: skipped {} degenerate curves", exporter.skipped());
    }
    exporter.finish()
}

/// Render a stroke document to an SVG string.
#[must_use]
pub fn to_svg_string(document: &StrokeDocument, config: &PadConfig) -> String {
    render_svg(document, config).to_string()
}

/// Render a stroke document to a base64 `data:` URL.
#[must_use]
pub fn to_svg_data_url(document: &StrokeDocument, config: &PadConfig) -> String {
    let svg = to_svg_string(document, config);
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::curve::{CurveWidths, Point};
    use crate::types::{PointerKind, StrokeStyle};
    use inkpad_config::{PressureOptions, SurfaceConfig};

    fn config() -> PadConfig {
        PadConfig {
            surface: SurfaceConfig {
                width: 600,
                height: 300,
                device_pixel_ratio: 2.0,
            },
            ..Default::default()
        }
    }

    fn stroke(pointer: PointerKind, points: Vec<Sample>) -> Stroke {
        Stroke::with_points(
            StrokeStyle {
                pen_color: Rgb::new(0x11, 0x22, 0x33),
                ..Default::default()
            },
            pointer,
            points,
        )
    }

    fn line(n: u64) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample::new(i as f64 * 10.0, 0.0, 0.5, i * 16))
            .collect()
    }

    #[test]
    fn test_fmt_fixed() {
        assert_eq!(fmt_fixed(1.0), "1.000");
        assert_eq!(fmt_fixed(-0.0), "0.000");
        assert_eq!(fmt_fixed(12.34567), "12.346");
    }

    #[test]
    fn test_fmt_fixed_rounds_ties_up() {
        assert_eq!(fmt_fixed(1.0625), "1.063");
        assert_eq!(fmt_fixed(0.3125), "0.313");
        assert_eq!(fmt_fixed(-1.0625), "-1.063");
        assert_eq!(fmt_fixed(0.4375), "0.438");
        // Not an exact tie in binary, stays below
        assert_eq!(fmt_fixed(1.0005), "1.000");
        assert_eq!(fmt_fixed(f64::NAN), "NaN");
    }

    #[test]
    fn test_curve_path_data() {
        let points = [0.0, 10.0, 20.0, 30.0].map(|x| Point::new(x, -0.0, 0.5, 0));
        let curve = Curve::from_points(&points, CurveWidths { start: 1.0, end: 1.0 });
        assert_eq!(
            curve_path_data(&curve),
            "M 10.000,0.000 C 15.000,0.000 15.000,0.000 20.000,0.000"
        );
    }

    #[test]
    fn test_document_frame() {
        let svg = to_svg_string(&StrokeDocument::new(), &config());
        assert!(svg.contains(r#"viewBox="0 0 300 150""#));
        assert!(svg.contains(r#"width="600""#));
        assert!(svg.contains(r#"height="300""#));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_one_path_per_curve() {
        let doc = StrokeDocument::from(vec![stroke(PointerKind::Mouse, line(5))]);
        let svg = to_svg_string(&doc, &config());

        assert_eq!(svg.matches("<path").count(), 3);
        assert_eq!(svg.matches("<circle").count(), 0);
        assert!(svg.contains(r##"stroke="#112233""##));
        assert!(svg.contains(r#"stroke-linecap="round""#));
        assert!(svg.contains(r#"d="M 0.000,0.000 C "#));
    }

    #[test]
    fn test_single_point_stroke_is_circle() {
        let doc = StrokeDocument::from(vec![stroke(
            PointerKind::Mouse,
            vec![Sample::new(4.0, 5.0, 0.5, 0)],
        )]);
        let svg = to_svg_string(&doc, &config());

        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.contains(r#"r="1.5""#));
        assert!(svg.contains(r#"cx="4""#));
        assert!(svg.contains(r##"fill="#112233""##));
    }

    #[test]
    fn test_degenerate_curves_are_skipped() {
        // Repeated samples give coincident points and NaN control points
        let points = vec![
            Sample::new(5.0, 5.0, 0.5, 0),
            Sample::new(5.0, 5.0, 0.5, 16),
            Sample::new(5.0, 5.0, 0.5, 32),
            Sample::new(25.0, 5.0, 0.5, 48),
            Sample::new(45.0, 5.0, 0.5, 64),
        ];
        let doc = StrokeDocument::from(vec![stroke(PointerKind::Mouse, points)]);

        let mut exporter = SvgExporter::new(&config());
        replay(doc.strokes(), &config(), &mut exporter);
        // Both segments ending on the repeated sample collapse; the third survives
        assert_eq!(exporter.skipped(), 2);

        let svg = exporter.finish().to_string();
        assert!(!svg.contains("NaN"));
        assert_eq!(svg.matches("<path").count(), 1);
    }

    #[test]
    fn test_stroke_width_scaling() {
        let doc = StrokeDocument::from(vec![stroke(PointerKind::Mouse, line(3))]);
        let mut exporter = SvgExporter::new(&config());
        replay(doc.strokes(), &config(), &mut exporter);
        let mouse = exporter.finish().to_string();

        // velocity 0.7 * 10/16, width 2.5 / (v + 1)
        let end_width = 2.5 / (0.7 * 10.0 / 16.0 + 1.0);
        let expected = format!(r#"stroke-width="{}""#, fmt_fixed(end_width * 2.25));
        assert!(mouse.contains(&expected), "{mouse}");

        let pen_config = PadConfig {
            pressure: PressureOptions {
                multiplier: 2.0,
                color: false,
                ..Default::default()
            },
            ..config()
        };
        let doc = StrokeDocument::from(vec![stroke(PointerKind::Pen, line(3))]);
        let pen = to_svg_string(&doc, &pen_config);
        // The curve's end width already carries pressure 0.5 * multiplier 2.0
        let expected = format!(
            r#"stroke-width="{}""#,
            fmt_fixed((end_width + 1.0) * 2.25 * 2.0 * 0.5)
        );
        assert!(pen.contains(&expected), "{pen}");
    }

    #[test]
    fn test_pen_stroke_width_with_default_pressure() {
        let doc = StrokeDocument::from(vec![stroke(PointerKind::Pen, line(3))]);
        let svg = to_svg_string(&doc, &config());

        // (2.5 / 1.4375 + 0.5) * 2.25 * 1.0 * 0.5
        assert!(svg.contains(r#"stroke-width="2.519""#), "{svg}");
    }

    #[test]
    fn test_data_url() {
        let url = to_svg_data_url(&StrokeDocument::new(), &config());
        let payload = url.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap();
        assert_eq!(decoded, to_svg_string(&StrokeDocument::new(), &config()));
    }
}
