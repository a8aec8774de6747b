//! Import and export of the pad's stroke document

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::export::{self, BiometricDocument};
use crate::render::{DrawSurface, StampRenderer, replay};
use crate::types::StrokeDocument;
use crate::validation::{ValidationError, validate_document};

use super::SignaturePad;

/// Options for [`SignaturePad::from_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FromDataOptions {
    /// Replace the current strokes instead of appending
    pub clear: bool,
}

impl Default for FromDataOptions {
    fn default() -> Self {
        Self { clear: true }
    }
}

impl<S: DrawSurface> SignaturePad<S> {
    /// Copy of every stroke drawn or imported so far
    pub fn to_data(&self) -> StrokeDocument {
        self.document.clone()
    }

    pub fn document(&self) -> &StrokeDocument {
        &self.document
    }

    /// Load strokes and draw them onto the surface
    ///
    /// Each stroke is redrawn with its own recorded style. On a validation
    /// error nothing is drawn and the current strokes are kept.
    pub fn from_data(
        &mut self,
        document: StrokeDocument,
        options: FromDataOptions,
    ) -> Result<(), ValidationError> {
        if let Err(e) = validate_document(&document) {
            warn!("from_data: rejecting document: {}", e);
            return Err(e);
        }

        if options.clear {
            self.clear();
        } else if self.stroking {
            self.end_stroke();
        }

        let mut renderer = StampRenderer::new(&mut self.surface, &self.config.pressure);
        replay(document.strokes(), &self.config, &mut renderer);

        debug!(
            "from_data: loaded {} strokes ({} samples), clear={}",
            document.len(),
            document.sample_count(),
            options.clear
        );
        self.document.extend(document);
        Ok(())
    }

    /// Render the strokes as an SVG string
    pub fn to_svg(&self) -> String {
        export::to_svg_string(&self.document, &self.config)
    }

    /// Render the strokes as a base64 SVG `data:` URL
    pub fn to_svg_data_url(&self) -> String {
        export::to_svg_data_url(&self.document, &self.config)
    }

    /// Biometric time series of every sample, or `None` for an empty pad
    pub fn to_biometric(&self) -> Option<BiometricDocument> {
        export::to_biometric(&self.document, &self.config.surface)
    }
}
