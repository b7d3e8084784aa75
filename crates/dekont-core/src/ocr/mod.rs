//! OCR capability used for image-only receipts.
//!
//! The pipeline only ever needs one operation from an OCR engine, turning a
//! page bitmap into text, so engines are plugged in behind [`TextRecognizer`].
//! That keeps the classifier and extractors testable without any engine
//! installed.

mod tesseract;
#[cfg(feature = "native")]
mod pure_engine;

pub use tesseract::TesseractRecognizer;
#[cfg(feature = "native")]
pub use pure_engine::OnnxRecognizer;

use std::sync::Arc;

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::config::{OcrConfig, OcrEngineKind};

/// Turns a rendered page into plain text, lines separated by `\n`.
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in `image`.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;

    /// Short engine name for logs.
    fn name(&self) -> &str {
        "ocr"
    }
}

/// Build the recognizer selected by the configuration.
///
/// Returns `Ok(None)` when OCR is disabled.
pub fn create_recognizer(config: &OcrConfig) -> Result<Option<Arc<dyn TextRecognizer>>, OcrError> {
    if !config.enabled {
        return Ok(None);
    }

    let recognizer: Arc<dyn TextRecognizer> = match config.engine {
        OcrEngineKind::Tesseract => Arc::new(TesseractRecognizer::from_config(config)?),
        #[cfg(feature = "native")]
        OcrEngineKind::Onnx => Arc::new(OnnxRecognizer::from_dir(&config.model_dir)?),
        #[cfg(not(feature = "native"))]
        OcrEngineKind::Onnx => {
            return Err(OcrError::EngineUnavailable(
                "built without the `native` feature".to_string(),
            ));
        }
    };

    Ok(Some(recognizer))
}
