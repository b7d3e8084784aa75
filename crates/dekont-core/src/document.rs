//! Per-request document with memoized text projections.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use image::DynamicImage;
use tracing::debug;

use crate::acquire::{self, AcquiredText, TextPolicy};
use crate::models::config::DekontConfig;
use crate::normalize::normalize;
use crate::ocr::TextRecognizer;

enum Source {
    Pdf(Vec<u8>),
    /// Text acquired elsewhere; there are no bytes to read.
    Text,
}

/// A receipt being checked.
///
/// Owns the raw bytes and computes each derived text at most once: the
/// per-page text layer, its normalized form, the OCR text of page 1 and its
/// normalized form. The classifier and the selected extractor both read from
/// the same instance, so a document is never read or recognized twice in one
/// request. OCR runs only when a recognizer was attached and a consumer asks
/// for OCR text.
pub struct Document {
    source: Source,
    max_pages: usize,
    min_text_length: usize,
    ocr_dpi: u32,
    recognizer: Option<Arc<dyn TextRecognizer>>,
    page_image: Option<DynamicImage>,
    pages: OnceLock<Vec<String>>,
    text_layer: OnceLock<String>,
    normalized: OnceLock<String>,
    ocr_text: OnceLock<String>,
    ocr_normalized: OnceLock<String>,
}

impl Document {
    fn with_source(source: Source) -> Self {
        Self {
            source,
            max_pages: 2,
            min_text_length: 1,
            ocr_dpi: 350,
            recognizer: None,
            page_image: None,
            pages: OnceLock::new(),
            text_layer: OnceLock::new(),
            normalized: OnceLock::new(),
            ocr_text: OnceLock::new(),
            ocr_normalized: OnceLock::new(),
        }
    }

    /// A PDF held in memory.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::with_source(Source::Pdf(bytes.into()))
    }

    /// Read a PDF from disk.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    /// A document whose text layer is already known.
    pub fn from_text_layer(text: impl Into<String>) -> Self {
        let doc = Self::with_source(Source::Text);
        let _ = doc.pages.set(vec![text.into()]);
        doc
    }

    /// Apply page, text-length and DPI settings.
    pub fn with_config(mut self, config: &DekontConfig) -> Self {
        self.max_pages = config.pdf.max_pages.max(1);
        self.min_text_length = config.pdf.min_text_length;
        self.ocr_dpi = config.ocr.effective_dpi();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_ocr_dpi(mut self, dpi: u32) -> Self {
        self.ocr_dpi = dpi;
        self
    }

    /// Attach an OCR engine. Without one, OCR text is always empty.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Supply the page-1 bitmap directly instead of rendering it from the PDF.
    pub fn with_page_image(mut self, image: DynamicImage) -> Self {
        self.page_image = Some(image);
        self
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.source {
            Source::Pdf(bytes) => bytes,
            Source::Text => &[],
        }
    }

    pub fn ocr_available(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Text layer of the first pages, one entry per page.
    pub fn page_texts(&self) -> &[String] {
        self.pages.get_or_init(|| match &self.source {
            Source::Pdf(bytes) => acquire::read_text_layer(bytes, self.max_pages),
            Source::Text => Vec::new(),
        })
    }

    /// All acquired pages joined with newlines.
    pub fn text_layer(&self) -> &str {
        self.text_layer.get_or_init(|| self.page_texts().join("\n"))
    }

    /// The first `max_pages` pages of the text layer.
    pub fn text_for_pages(&self, max_pages: usize) -> Cow<'_, str> {
        let pages = self.page_texts();
        if max_pages >= pages.len() {
            Cow::Borrowed(self.text_layer())
        } else {
            Cow::Owned(pages[..max_pages].join("\n"))
        }
    }

    pub fn normalized_text(&self) -> &str {
        self.normalized.get_or_init(|| normalize(self.text_layer()))
    }

    /// Whether the text layer carries usable text.
    pub fn has_text_layer(&self) -> bool {
        let len = self.text_layer().trim().chars().count();
        len > 0 && len >= self.min_text_length
    }

    /// OCR text of page 1, empty when no engine is attached or OCR failed.
    pub fn ocr_text(&self) -> &str {
        self.ocr_text.get_or_init(|| {
            let Some(recognizer) = self.recognizer.as_deref() else {
                return String::new();
            };

            let rendered;
            let image = match &self.page_image {
                Some(image) => image,
                None => match &self.source {
                    Source::Pdf(bytes) => match acquire::render_first_page(bytes, self.ocr_dpi) {
                        Some(image) => {
                            rendered = image;
                            &rendered
                        }
                        None => return String::new(),
                    },
                    Source::Text => return String::new(),
                },
            };

            debug!("Running {} on page 1", recognizer.name());
            acquire::recognize_page(recognizer, image)
        })
    }

    pub fn ocr_normalized_text(&self) -> &str {
        self.ocr_normalized.get_or_init(|| normalize(self.ocr_text()))
    }

    /// Acquire text under a consumer's page limit and OCR policy.
    pub fn acquire_text(&self, max_pages: usize, policy: TextPolicy) -> AcquiredText<'_> {
        acquire::acquire_text(self, max_pages, policy)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("bytes", &self.bytes().len())
            .field("max_pages", &self.max_pages)
            .field("ocr", &self.recognizer.as_ref().map(|r| r.name().to_string()))
            .field("text_loaded", &self.pages.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRecognizer(AtomicUsize);

    impl TextRecognizer for CountingRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("İŞLEM  Tamam".to_string())
        }
    }

    #[test]
    fn test_text_is_normalized_once() {
        let doc = Document::from_text_layer("ZİRAAT\n  Bankası");
        assert_eq!(doc.normalized_text(), "ziraat bankasi");
        assert!(std::ptr::eq(doc.normalized_text(), doc.normalized_text()));
    }

    #[test]
    fn test_ocr_runs_at_most_once() {
        let recognizer = Arc::new(CountingRecognizer(AtomicUsize::new(0)));
        let doc = Document::from_text_layer("")
            .with_recognizer(recognizer.clone())
            .with_page_image(DynamicImage::new_rgb8(4, 4));

        assert_eq!(doc.ocr_normalized_text(), "islem tamam");
        assert_eq!(doc.ocr_text(), "İŞLEM  Tamam");
        assert_eq!(recognizer.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_recognizer_means_no_ocr_text() {
        let doc = Document::from_text_layer("").with_page_image(DynamicImage::new_rgb8(4, 4));
        assert!(!doc.ocr_available());
        assert_eq!(doc.ocr_text(), "");
    }

    #[test]
    fn test_unreadable_pdf_has_empty_layer() {
        let doc = Document::from_bytes(b"not a pdf".to_vec());
        assert_eq!(doc.text_layer(), "");
        assert!(!doc.has_text_layer());
    }

    #[test]
    fn test_min_text_length() {
        let mut config = DekontConfig::default();
        config.pdf.min_text_length = 10;
        let doc = Document::from_text_layer("short").with_config(&config);
        assert!(!doc.has_text_layer());
    }

    #[test]
    fn test_document_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();
    }
}
