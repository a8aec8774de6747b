use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::export::ExportError;

/// Kind of device that produced a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    /// Stylus; the only kind that drives pressure-reactive color and width
    Pen,
}

impl PointerKind {
    pub fn is_stylus(self) -> bool {
        self == PointerKind::Pen
    }
}

/// One pointer sample as delivered by the host's input binding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    /// Pressure 0.0-1.0
    pub pressure: f64,
    pub pointer: PointerKind,
    /// Timestamp in milliseconds
    pub time: u64,
}

impl PointerInput {
    pub fn new(x: f64, y: f64, pressure: f64, pointer: PointerKind, time: u64) -> Self {
        Self {
            x,
            y,
            pressure,
            pointer,
            time,
        }
    }

    pub fn sample(&self) -> Sample {
        Sample {
            x: self.x,
            y: self.y,
            pressure: self.pressure,
            time: self.time,
        }
    }
}

/// A stored sample of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    /// Pressure 0.0-1.0
    pub pressure: f64,
    /// Timestamp in milliseconds
    pub time: u64,
}

impl Sample {
    pub fn new(x: f64, y: f64, pressure: f64, time: u64) -> Self {
        Self {
            x,
            y,
            pressure,
            time,
        }
    }

    pub fn distance_to(&self, other: &Sample) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Style snapshotted when a stroke begins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub pen_color: Rgb,
    pub dot_size: f64,
    pub min_width: f64,
    pub max_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            pen_color: Rgb::BLACK,
            dot_size: 0.0,
            min_width: 0.5,
            max_width: 2.5,
        }
    }
}

impl StrokeStyle {
    /// Width at stroke start, and dot radius when no dot size is set
    pub fn mid_width(&self) -> f64 {
        (self.min_width + self.max_width) / 2.0
    }

    /// Radius of a single-point stroke before pressure widening
    pub fn dot_radius(&self) -> f64 {
        if self.dot_size > 0.0 {
            self.dot_size
        } else {
            self.mid_width()
        }
    }
}

/// One pen-down-to-pen-up action (or a single tap)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    #[serde(flatten)]
    pub style: StrokeStyle,
    #[serde(default)]
    pub pointer_type: PointerKind,
    pub points: Vec<Sample>,
}

impl Stroke {
    pub fn new(style: StrokeStyle, pointer_type: PointerKind) -> Self {
        Self {
            style,
            pointer_type,
            points: Vec::new(),
        }
    }

    pub fn with_points(style: StrokeStyle, pointer_type: PointerKind, points: Vec<Sample>) -> Self {
        Self {
            style,
            pointer_type,
            points,
        }
    }

    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }
}

/// All strokes of a pad in drawing order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeDocument {
    strokes: Vec<Stroke>,
}

impl StrokeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of samples across all strokes
    pub fn sample_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }

    /// Samples of every stroke, flattened in drawing order
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.strokes.iter().flat_map(|s| s.points.iter())
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub(crate) fn extend(&mut self, other: StrokeDocument) {
        self.strokes.extend(other.strokes);
    }

    /// The most recently started stroke
    pub(crate) fn active_stroke_mut(&mut self) -> Option<&mut Stroke> {
        self.strokes.last_mut()
    }

    pub(crate) fn clear(&mut self) {
        self.strokes.clear();
    }
}

impl From<Vec<Stroke>> for StrokeDocument {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }
}
