//! Tesseract CLI recognizer.

use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use super::TextRecognizer;
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs the `tesseract` binary on a temporary PNG of the page.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    languages: String,
    dpi: u32,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<PathBuf>, languages: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            languages: languages.into(),
            dpi: 350,
        }
    }

    /// Build from configuration, checking that the binary runs.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let recognizer = Self::new(&config.tesseract_path, &config.languages)
            .with_dpi(config.effective_dpi());

        if !recognizer.is_available() {
            return Err(OcrError::EngineUnavailable(format!(
                "tesseract not found at '{}'",
                recognizer.binary.display()
            )));
        }
        Ok(recognizer)
    }

    /// Resolution hint passed along with the image.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Whether `tesseract --version` runs.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();

        let file = tempfile::Builder::new()
            .prefix("dekont-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Recognition(format!("failed to create temp file: {e}")))?;

        image
            .save_with_format(file.path(), image::ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let output = Command::new(&self.binary)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .arg("--dpi")
            .arg(self.dpi.to_string())
            .output()
            .map_err(|e| {
                OcrError::EngineUnavailable(format!(
                    "failed to run tesseract at '{}': {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("tesseract produced {} chars", text.len());
        info!("OCR complete in {}ms", start.elapsed().as_millis());
        Ok(text)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_unavailable() {
        let recognizer = TesseractRecognizer::new("/nonexistent/tesseract-bin", "tur+eng");
        assert!(!recognizer.is_available());

        let image = DynamicImage::new_rgb8(4, 4);
        let err = recognizer.recognize(&image).unwrap_err();
        assert!(matches!(err, OcrError::EngineUnavailable(_)));
    }

    #[test]
    fn test_from_config_rejects_missing_binary() {
        let config = OcrConfig {
            tesseract_path: PathBuf::from("/nonexistent/tesseract-bin"),
            ..OcrConfig::default()
        };
        assert!(TesseractRecognizer::from_config(&config).is_err());
    }
}
