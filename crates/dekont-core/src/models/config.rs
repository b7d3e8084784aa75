//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the dekont pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DekontConfig {
    /// PDF text-layer configuration.
    pub pdf: PdfConfig,

    /// OCR fallback configuration.
    pub ocr: OcrConfig,

    /// Detector chain configuration.
    pub classifier: ClassifierConfig,
}

/// PDF text-layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Pages read from the text layer. Extractors may read fewer.
    pub max_pages: usize,

    /// Text layers shorter than this (after trimming) count as empty.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 2,
            min_text_length: 1,
        }
    }
}

/// Which recognizer backs the OCR capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// External `tesseract` binary.
    #[default]
    Tesseract,
    /// Bundled ONNX models through pure-onnx-ocr.
    Onnx,
}

/// OCR fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Allow OCR at all. Off by default: OCR is slow and only a few issuers need it.
    pub enabled: bool,

    /// Recognizer implementation.
    pub engine: OcrEngineKind,

    /// Target resolution for the page bitmap.
    pub dpi: u32,

    /// Tesseract language string.
    pub languages: String,

    /// Path or name of the tesseract executable.
    pub tesseract_path: PathBuf,

    /// Directory with `det.onnx`, `latin_rec.onnx` and `latin_dict.txt`.
    pub model_dir: PathBuf,

    /// Leading characters of OCR text the OCR-stage rules look at.
    pub window_chars: usize,

    /// Per-document budget for acquisition, classification and extraction.
    pub timeout_secs: u64,
}

impl OcrConfig {
    pub const MIN_DPI: u32 = 300;
    pub const MAX_DPI: u32 = 350;

    /// DPI clamped into the range the recognizers are tuned for.
    pub fn effective_dpi(&self) -> u32 {
        self.dpi.clamp(Self::MIN_DPI, Self::MAX_DPI)
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            engine: OcrEngineKind::default(),
            dpi: 350,
            languages: "tur+eng".to_string(),
            tesseract_path: PathBuf::from("tesseract"),
            model_dir: PathBuf::from("models"),
            window_chars: 2000,
            timeout_secs: 60,
        }
    }
}

/// Detector chain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Evaluate legal-name rules when no domain rule matched.
    pub name_fallback: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            name_fallback: true,
        }
    }
}

impl DekontConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
