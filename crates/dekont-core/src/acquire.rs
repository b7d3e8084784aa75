//! Text acquisition: PDF text layer first, OCR of page 1 when allowed.
//!
//! Nothing in here returns an error. A PDF that cannot be parsed, a page
//! without images or a failing OCR engine all degrade to an empty string,
//! logged at `warn`, so the classifier and extractors always get text.

use std::borrow::Cow;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::models::DetectionMethod;
use crate::ocr::TextRecognizer;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Where an extractor wants its text from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextPolicy {
    /// Embedded text layer only.
    #[default]
    TextLayer,
    /// Text layer, OCR when the layer is blank.
    OcrFallback,
    /// OCR whenever an engine is available. For issuers whose receipts are
    /// scans with at most a footer in the text layer.
    OcrPreferred,
}

/// Text handed to the classifier or an extractor, with its origin.
#[derive(Debug, Clone)]
pub struct AcquiredText<'a> {
    pub text: Cow<'a, str>,
    pub method: DetectionMethod,
}

impl AcquiredText<'_> {
    fn none() -> Self {
        Self {
            text: Cow::Borrowed(""),
            method: DetectionMethod::None,
        }
    }
}

/// Read the text layer of the first `max_pages` pages.
pub fn read_text_layer(bytes: &[u8], max_pages: usize) -> Vec<String> {
    let start = Instant::now();
    let extractor = match PdfExtractor::from_bytes(bytes) {
        Ok(extractor) => extractor,
        Err(e) => {
            warn!("Cannot open PDF for text extraction: {}", e);
            return Vec::new();
        }
    };

    match extractor.extract_page_texts(max_pages) {
        Ok(pages) => {
            debug!(
                "Text layer: {} pages, {} chars in {}ms",
                pages.len(),
                pages.iter().map(String::len).sum::<usize>(),
                start.elapsed().as_millis()
            );
            pages
        }
        Err(e) => {
            warn!("Text layer extraction failed: {}", e);
            Vec::new()
        }
    }
}

/// Render page 1 of a PDF to a bitmap at `dpi`.
pub fn render_first_page(bytes: &[u8], dpi: u32) -> Option<DynamicImage> {
    let extractor = PdfExtractor::from_bytes(bytes)
        .map_err(|e| warn!("Cannot open PDF for rendering: {}", e))
        .ok()?;
    extractor
        .render_page(1, dpi)
        .map_err(|e| warn!("Cannot render page 1: {}", e))
        .ok()
}

/// Run the recognizer, degrading failures to an empty string.
pub fn recognize_page(recognizer: &dyn TextRecognizer, image: &DynamicImage) -> String {
    let start = Instant::now();
    match recognizer.recognize(image) {
        Ok(text) => {
            info!(
                "{} recognized {} chars in {}ms",
                recognizer.name(),
                text.len(),
                start.elapsed().as_millis()
            );
            text
        }
        Err(e) => {
            warn!("{} failed: {}", recognizer.name(), e);
            String::new()
        }
    }
}

/// Acquire text for one consumer under its policy.
pub fn acquire_text(document: &Document, max_pages: usize, policy: TextPolicy) -> AcquiredText<'_> {
    let layer = || AcquiredText {
        text: document.text_for_pages(max_pages),
        method: DetectionMethod::Text,
    };
    let ocr = || {
        let text = document.ocr_text();
        if text.trim().is_empty() {
            None
        } else {
            Some(AcquiredText {
                text: Cow::Borrowed(text),
                method: DetectionMethod::Ocr,
            })
        }
    };

    let acquired = match policy {
        TextPolicy::TextLayer => document.has_text_layer().then(layer),
        TextPolicy::OcrFallback => {
            if document.has_text_layer() {
                Some(layer())
            } else {
                ocr()
            }
        }
        TextPolicy::OcrPreferred => ocr().or_else(|| document.has_text_layer().then(layer)),
    };

    let acquired = acquired.unwrap_or_else(AcquiredText::none);
    debug!("Acquired {} chars via {}", acquired.text.len(), acquired.method);
    acquired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use std::sync::Arc;

    struct FixedRecognizer(&'static str);

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenRecognizer;

    impl TextRecognizer for BrokenRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            Err(OcrError::Recognition("no models".to_string()))
        }
    }

    fn scanned(layer: &str, recognizer: Arc<dyn TextRecognizer>) -> Document {
        Document::from_text_layer(layer)
            .with_recognizer(recognizer)
            .with_page_image(DynamicImage::new_rgb8(8, 8))
    }

    #[test]
    fn test_garbage_bytes_give_no_pages() {
        assert!(read_text_layer(b"%PDF-broken", 2).is_empty());
        assert!(render_first_page(b"nope", 300).is_none());
    }

    #[test]
    fn test_text_layer_policy() {
        let doc = Document::from_text_layer("Page one");
        let acquired = acquire_text(&doc, 2, TextPolicy::TextLayer);
        assert_eq!(acquired.text, "Page one");
        assert_eq!(acquired.method, DetectionMethod::Text);
    }

    #[test]
    fn test_blank_layer_without_ocr_is_none() {
        let doc = Document::from_text_layer("   ");
        let acquired = acquire_text(&doc, 2, TextPolicy::OcrFallback);
        assert_eq!(acquired.text, "");
        assert_eq!(acquired.method, DetectionMethod::None);
    }

    #[test]
    fn test_fallback_uses_ocr_only_for_blank_layer() {
        let doc = scanned("", Arc::new(FixedRecognizer("OCR TEXT")));
        let acquired = acquire_text(&doc, 1, TextPolicy::OcrFallback);
        assert_eq!(acquired.text, "OCR TEXT");
        assert_eq!(acquired.method, DetectionMethod::Ocr);

        let doc = scanned("layer text", Arc::new(FixedRecognizer("OCR TEXT")));
        let acquired = acquire_text(&doc, 1, TextPolicy::OcrFallback);
        assert_eq!(acquired.text, "layer text");
    }

    #[test]
    fn test_preferred_uses_ocr_over_layer() {
        let doc = scanned("footer only", Arc::new(FixedRecognizer("full scan")));
        let acquired = acquire_text(&doc, 1, TextPolicy::OcrPreferred);
        assert_eq!(acquired.text, "full scan");
    }

    #[test]
    fn test_failing_ocr_degrades_to_layer() {
        let doc = scanned("footer only", Arc::new(BrokenRecognizer));
        let acquired = acquire_text(&doc, 1, TextPolicy::OcrPreferred);
        assert_eq!(acquired.text, "footer only");
        assert_eq!(acquired.method, DetectionMethod::Text);
    }
}
