//! Core library for Turkish bank receipt (dekont) checking.
//!
//! This crate provides:
//! - Text acquisition from PDF text layers, with OCR of page 1 for image-only receipts
//! - Issuer and layout classification over a priority-ordered rule table
//! - Per-issuer field extraction (parties, IBAN, amount, time, receipt numbers)
//! - A conservative transaction status policy

pub mod acquire;
pub mod classify;
pub mod document;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod status;

pub use acquire::TextPolicy;
pub use classify::{classify, Classifier};
pub use document::Document;
pub use error::{DekontError, ExtractionError, OcrError, PdfError, Result};
pub use extract::{dispatch, lookup, registered_keys, Extractor, ExtractorRegistry, ReceiptText};
pub use models::{
    Classification, DekontConfig, DetectionMethod, FieldRecord, Issuer, OcrEngineKind,
    StatusOutcome,
};
pub use normalize::normalize;
pub use ocr::{create_recognizer, TextRecognizer, TesseractRecognizer};
#[cfg(feature = "native")]
pub use ocr::OnnxRecognizer;
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::{check, CheckReport, Pipeline};
pub use status::{classify_status, StatusVocabulary};
