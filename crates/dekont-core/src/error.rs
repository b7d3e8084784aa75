//! Error types for dekont-core.
//!
//! None of these reach a caller of `check`: acquisition turns PDF and OCR
//! failures into empty text, and dispatch turns extraction failures into an
//! error record.

use thiserror::Error;

/// Top-level error for fallible setup and I/O.
#[derive(Error, Debug)]
pub enum DekontError {
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration values the pipeline cannot run with.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Reading a receipt PDF.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("cannot parse PDF: {0}")]
    Parse(String),

    #[error("cannot read text layer: {0}")]
    TextExtraction(String),

    #[error("cannot read embedded images: {0}")]
    ImageExtraction(String),

    /// Encrypted with a non-empty user password.
    #[error("PDF is password protected")]
    Encrypted,

    #[error("PDF has no pages")]
    NoPages,

    /// 1-based page number outside the document.
    #[error("no page {0} in PDF")]
    InvalidPage(u32),
}

/// Recognizing text on a page image.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Model files missing or unreadable.
    #[error("cannot load OCR model: {0}")]
    ModelLoad(String),

    #[error("recognition failed: {0}")]
    Recognition(String),

    #[error("unusable page image: {0}")]
    InvalidImage(String),

    /// Engine not installed or not compiled in.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("OCR timed out after {0}s")]
    Timeout(u64),
}

/// Running an issuer extractor.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("No extractor registered for key: {0}")]
    NoExtractor(String),

    #[error("{key} extractor failed: {reason}")]
    Failed { key: String, reason: String },

    #[error("{key} extractor panicked: {message}")]
    Panicked { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, DekontError>;
