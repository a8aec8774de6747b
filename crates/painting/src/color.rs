//! Pen colors and pressure-driven color modulation

use std::fmt;
use std::str::FromStr;

use inkpad_config::PressureOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::PointerKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("Color must have 3 or 6 hex digits: {0:?}")]
    InvalidLength(String),
    #[error("Invalid hex digit in color: {0:?}")]
    InvalidDigit(String),
}

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Baseline substituted for black, which a luminance shift cannot change
    pub const BLACK_BASELINE: Rgb = Rgb::new(0x80, 0x80, 0x80);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Shift every channel by `channel * lum`, clamped to 0..=255
    ///
    /// Positive `lum` lightens, negative darkens.
    pub fn shift_luminance(self, lum: f64) -> Rgb {
        let shift = |c: u8| {
            let c = c as f64;
            (c + c * lum).clamp(0.0, 255.0).round() as u8
        };
        Rgb::new(shift(self.r), shift(self.g), shift(self.b))
    }

    /// Channels as floats 0.0-1.0 with full alpha
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLACK
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }

        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| ColorParseError::InvalidDigit(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Rgb::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #rgb expands each digit to two
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Rgb::new(r * 17, g * 17, b * 17))
            }
            _ => Err(ColorParseError::InvalidLength(s.to_string())),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Derives the per-sample stroke color from the pen color and pressure
#[derive(Debug, Clone, Copy)]
pub struct ColorModulator {
    enabled: bool,
    threshold: f64,
}

impl ColorModulator {
    pub fn new(options: &PressureOptions) -> Self {
        Self {
            enabled: options.color,
            threshold: options.threshold,
        }
    }

    /// Color for a sample of the given pressure
    ///
    /// Stylus input lightens the pen color by the threshold fraction, then
    /// darkens it by the pressure once the pressure exceeds the threshold.
    pub fn color_for(&self, base: Rgb, pressure: f64, pointer: PointerKind) -> Rgb {
        if !self.enabled || !pointer.is_stylus() {
            return base;
        }

        let baseline = if base == Rgb::BLACK {
            Rgb::BLACK_BASELINE
        } else {
            base
        };
        let lightened = baseline.shift_luminance(self.threshold);

        if pressure > self.threshold {
            lightened.shift_luminance(-pressure)
        } else {
            lightened
        }
    }
}
