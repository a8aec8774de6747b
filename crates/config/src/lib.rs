//! Shared configuration for inkpad
//!
//! This crate provides the single source of truth for drawing surface
//! dimensions, stroke shaping options and pressure response settings shared
//! by every host embedding the pad.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default surface width in pixels
pub const DEFAULT_WIDTH: u32 = 300;

/// Default surface height in pixels
pub const DEFAULT_HEIGHT: u32 = 150;

/// Default device pixel ratio (1.0 = no scaling)
pub const DEFAULT_DEVICE_PIXEL_RATIO: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Surface must have non-zero dimensions, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
    #[error("Device pixel ratio must be positive, got {0}")]
    InvalidPixelRatio(f64),
    #[error("Width range is inverted: min {min} > max {max}")]
    InvertedWidthRange { min: f64, max: f64 },
    #[error("{field} must be a non-negative finite number, got {value}")]
    NegativeValue { field: &'static str, value: f64 },
    #[error("Velocity filter weight must be in (0, 1], got {0}")]
    InvalidFilterWeight(f64),
}

/// Drawing surface configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Surface width in physical pixels
    pub width: u32,
    /// Surface height in physical pixels
    pub height: u32,
    /// Physical pixels per CSS pixel
    pub device_pixel_ratio: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            device_pixel_ratio: DEFAULT_DEVICE_PIXEL_RATIO,
        }
    }
}

impl SurfaceConfig {
    /// Create a new surface config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: DEFAULT_DEVICE_PIXEL_RATIO,
        }
    }

    /// Ratio used for coordinate scaling, never below 1.0
    pub fn effective_ratio(&self) -> f64 {
        self.device_pixel_ratio.max(1.0)
    }

    /// Width in logical (CSS) pixels
    pub fn logical_width(&self) -> f64 {
        self.width as f64 / self.effective_ratio()
    }

    /// Height in logical (CSS) pixels
    pub fn logical_height(&self) -> f64 {
        self.height as f64 / self.effective_ratio()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(ConfigError::InvalidPixelRatio(self.device_pixel_ratio));
        }
        Ok(())
    }
}

/// Options that shape a stroke, snapshotted when a stroke begins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeOptions {
    /// Radius of a single-point dot; 0 means "midpoint of the width range"
    pub dot_size: f64,
    /// Minimum stroke width
    pub min_width: f64,
    /// Maximum stroke width (before pressure widening)
    pub max_width: f64,
    /// Samples closer than this to the last accepted one are dropped
    pub min_distance: f64,
    /// Weight of the newest velocity in the exponential smoothing
    pub velocity_filter_weight: f64,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            dot_size: 0.0,
            min_width: 0.5,
            max_width: 2.5,
            min_distance: 5.0,
            velocity_filter_weight: 0.7,
        }
    }
}

impl StrokeOptions {
    /// Width used at stroke start and for dots without an explicit size
    pub fn mid_width(&self) -> f64 {
        (self.min_width + self.max_width) / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("dot_size", self.dot_size),
            ("min_width", self.min_width),
            ("max_width", self.max_width),
            ("min_distance", self.min_distance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }
        if self.min_width > self.max_width {
            return Err(ConfigError::InvertedWidthRange {
                min: self.min_width,
                max: self.max_width,
            });
        }
        let weight = self.velocity_filter_weight;
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(ConfigError::InvalidFilterWeight(weight));
        }
        Ok(())
    }
}

/// Pressure-reactive behavior for stylus input
///
/// Both switches default to on. An explicit `false` turns the feature off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureOptions {
    /// Shift the pen color with pressure
    pub color: bool,
    /// Widen strokes with pressure
    pub width: bool,
    /// Width added per unit of pressure
    pub multiplier: f64,
    /// Pressure above which the color darkens; also the lightening fraction
    pub threshold: f64,
}

impl Default for PressureOptions {
    fn default() -> Self {
        Self {
            color: true,
            width: true,
            multiplier: 1.0,
            threshold: 0.25,
        }
    }
}

impl PressureOptions {
    /// Pressure response with both features switched off
    pub fn disabled() -> Self {
        Self {
            color: false,
            width: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("multiplier", self.multiplier), ("threshold", self.threshold)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }
        Ok(())
    }
}

/// Complete pad configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    pub surface: SurfaceConfig,
    pub stroke: StrokeOptions,
    pub pressure: PressureOptions,
}

impl PadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.surface.validate()?;
        self.stroke.validate()?;
        self.pressure.validate()
    }
}
