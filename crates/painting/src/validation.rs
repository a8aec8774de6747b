use thiserror::Error;

use crate::types::{Stroke, StrokeDocument};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Stroke {stroke}, point {point}: coordinates ({x}, {y}) are not finite")]
    NonFiniteCoordinate {
        stroke: usize,
        point: usize,
        x: f64,
        y: f64,
    },
    #[error("Stroke {stroke}, point {point}: pressure {pressure} outside 0..=1")]
    PressureOutOfRange {
        stroke: usize,
        point: usize,
        pressure: f64,
    },
    #[error("Stroke {stroke}: invalid width range {min}..{max}")]
    InvalidWidthRange { stroke: usize, min: f64, max: f64 },
    #[error("Stroke {stroke}: invalid dot size {dot_size}")]
    InvalidDotSize { stroke: usize, dot_size: f64 },
}

/// Validate one stroke's style and samples
pub fn validate_stroke(index: usize, stroke: &Stroke) -> Result<(), ValidationError> {
    let style = &stroke.style;
    let widths_ok = style.min_width.is_finite()
        && style.max_width.is_finite()
        && style.min_width >= 0.0
        && style.min_width <= style.max_width;
    if !widths_ok {
        return Err(ValidationError::InvalidWidthRange {
            stroke: index,
            min: style.min_width,
            max: style.max_width,
        });
    }
    if !(style.dot_size.is_finite() && style.dot_size >= 0.0) {
        return Err(ValidationError::InvalidDotSize {
            stroke: index,
            dot_size: style.dot_size,
        });
    }

    for (point, sample) in stroke.points.iter().enumerate() {
        if !(sample.x.is_finite() && sample.y.is_finite()) {
            return Err(ValidationError::NonFiniteCoordinate {
                stroke: index,
                point,
                x: sample.x,
                y: sample.y,
            });
        }
        if !(0.0..=1.0).contains(&sample.pressure) {
            return Err(ValidationError::PressureOutOfRange {
                stroke: index,
                point,
                pressure: sample.pressure,
            });
        }
    }

    Ok(())
}

/// Validate a document before it is imported
pub fn validate_document(document: &StrokeDocument) -> Result<(), ValidationError> {
    document
        .strokes()
        .iter()
        .enumerate()
        .try_for_each(|(index, stroke)| validate_stroke(index, stroke))
}
