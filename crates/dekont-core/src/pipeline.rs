//! Classify-then-extract pipeline for one receipt.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::Classifier;
use crate::document::Document;
use crate::error::{DekontError, Result};
use crate::extract::ExtractorRegistry;
use crate::models::{Classification, DekontConfig, FieldRecord};
use crate::ocr::{create_recognizer, TextRecognizer};

/// Outcome of checking one receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Issuer and layout the receipt was classified as.
    pub detected: Classification,
    /// Fields read by the extractor registered for `detected.key`.
    pub data: FieldRecord,
    /// Wall time of classification plus extraction.
    #[serde(skip)]
    pub processing_time_ms: u64,
}

impl CheckReport {
    /// Report for a receipt that could not be processed at all.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            detected: Classification::unknown(),
            data: FieldRecord::from_error(message),
            processing_time_ms: 0,
        }
    }
}

/// Classifier, registry and OCR engine configured once and reused across documents.
pub struct Pipeline {
    config: DekontConfig,
    classifier: Classifier,
    registry: ExtractorRegistry,
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl Pipeline {
    /// Pipeline with default configuration and no OCR.
    pub fn new() -> Self {
        Self {
            config: DekontConfig::default(),
            classifier: Classifier::new(),
            registry: ExtractorRegistry::builtin(),
            recognizer: None,
        }
    }

    /// Pipeline for `config`, building the configured OCR engine if enabled.
    pub fn from_config(config: &DekontConfig) -> Result<Self> {
        if config.pdf.max_pages == 0 {
            return Err(DekontError::Config("pdf.max_pages must be at least 1".to_string()));
        }
        if config.ocr.enabled && config.ocr.window_chars == 0 {
            return Err(DekontError::Config("ocr.window_chars must be at least 1".to_string()));
        }

        let recognizer = create_recognizer(&config.ocr)?;
        if let Some(recognizer) = &recognizer {
            info!("OCR enabled with {}", recognizer.name());
        }
        Ok(Self {
            config: config.clone(),
            classifier: Classifier::from_config(&config.classifier, &config.ocr),
            registry: ExtractorRegistry::builtin(),
            recognizer,
        })
    }

    /// Use `recognizer` for OCR instead of the configured engine.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn config(&self) -> &DekontConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Wrap PDF bytes in a document carrying this pipeline's settings.
    pub fn document(&self, bytes: impl Into<Vec<u8>>) -> Document {
        let document = Document::from_bytes(bytes).with_config(&self.config);
        match &self.recognizer {
            Some(recognizer) => document.with_recognizer(Arc::clone(recognizer)),
            None => document,
        }
    }

    /// Read a PDF from disk into a configured document.
    pub fn open(&self, path: &Path) -> Result<Document> {
        debug!("Reading {}", path.display());
        Ok(self.document(std::fs::read(path)?))
    }

    /// Classification only.
    pub fn detect(&self, document: &Document) -> Classification {
        self.classifier.classify(document)
    }

    /// Classify the document, then run the extractor registered for the key.
    ///
    /// Never fails: an unknown issuer or a failing extractor shows up as an
    /// error record in `data`.
    pub fn check(&self, document: &Document) -> CheckReport {
        let start = Instant::now();

        let detected = self.classifier.classify(document);
        let data = self.registry.dispatch(&detected.key, document);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Checked receipt: {} ({}), {} fields, status {} in {}ms",
            detected.key,
            detected.method,
            data.filled_fields(),
            data.tr_status,
            processing_time_ms
        );

        CheckReport {
            detected,
            data,
            processing_time_ms,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a document with the default pipeline.
pub fn check(document: &Document) -> CheckReport {
    Pipeline::new().check(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetectionMethod, StatusOutcome};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_report_shape() {
        let doc = Document::from_text_layer("www.upt.com.tr\nReceipt No UPT-1");
        let report = check(&doc);
        assert_eq!(report.detected.key, "UPT");
        assert_eq!(report.detected.method, DetectionMethod::Text);
        assert_eq!(report.data.receipt_no.as_deref(), Some("UPT-1"));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["detected"]["bank"], json!("UPT"));
        assert_eq!(value["data"]["tr_status"], json!("completed"));
        assert!(value.get("processing_time_ms").is_none());
    }

    #[test]
    fn test_unknown_document_gets_error_record() {
        let report = check(&Document::from_text_layer("plain text, no bank here"));
        assert!(report.detected.is_unknown());
        assert!(report.data.is_error());
        assert_eq!(report.data.tr_status, StatusOutcome::Unknown);
    }

    #[test]
    fn test_config_without_pages_is_rejected() {
        let mut config = DekontConfig::default();
        config.pdf.max_pages = 0;
        let err = Pipeline::from_config(&config).err().unwrap();
        assert!(matches!(err, DekontError::Config(_)));
    }

    #[test]
    fn test_failed_report() {
        let report = CheckReport::failed("timed out");
        assert!(report.detected.is_unknown());
        assert_eq!(report.data.error.as_deref(), Some("timed out"));
    }
}
