//! Serializers for finished stroke documents
//!
//! - [`svg`] replays the document through the curve fitter and emits one
//!   cubic path per curve
//! - [`biometric`] turns the raw samples into a millimetre-scaled,
//!   velocity-annotated time series

pub mod biometric;
pub mod svg;

pub use self::biometric::{BiometricDocument, SamplePoint, to_biometric};
pub use self::svg::{SvgExporter, render_svg, to_svg_data_url, to_svg_string};

/// Error type for JSON encoding of documents and records.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
