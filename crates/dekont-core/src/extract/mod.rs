//! Receipt field extraction.
//!
//! Every issuer layout has one [`Extractor`]. The registry picks it by
//! classification key, acquires text the way the extractor asks for (page
//! limit, OCR policy) and turns every failure into an error record.

pub mod banks;
pub mod registry;
pub mod rules;

pub use registry::{dispatch, dispatch_text, lookup, registered_keys, ExtractorRegistry};

use std::borrow::Cow;

use crate::acquire::TextPolicy;
use crate::document::Document;
use crate::error::ExtractionError;
use crate::models::{DetectionMethod, FieldRecord, Issuer, StatusOutcome};
use crate::normalize::normalize;
use crate::status::{classify_status, StatusVocabulary};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Text handed to an extractor: as acquired, and normalized.
#[derive(Debug, Clone)]
pub struct ReceiptText<'a> {
    pub raw: Cow<'a, str>,
    pub normalized: Cow<'a, str>,
    pub method: DetectionMethod,
}

impl<'a> ReceiptText<'a> {
    /// Wrap text acquired outside a [`Document`]; normalizes it once.
    pub fn new(raw: impl Into<Cow<'a, str>>) -> Self {
        let raw = raw.into();
        let normalized = Cow::Owned(normalize(&raw));
        Self {
            raw,
            normalized,
            method: DetectionMethod::Text,
        }
    }

    /// Acquire text from a document, reusing its memoized normalized forms
    /// when the acquired text is the document's full text layer or its OCR text.
    pub fn acquire(document: &'a Document, max_pages: usize, policy: TextPolicy) -> Self {
        let acquired = document.acquire_text(max_pages, policy);
        let normalized = match (&acquired.text, acquired.method) {
            (Cow::Borrowed(_), DetectionMethod::Text) => Cow::Borrowed(document.normalized_text()),
            (_, DetectionMethod::Ocr) => Cow::Borrowed(document.ocr_normalized_text()),
            (text, _) => Cow::Owned(normalize(text)),
        };
        Self {
            raw: acquired.text,
            normalized,
            method: acquired.method,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// FAST (instant) or Havale (account-to-account) transfer layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Fast,
    Havale,
}

/// Field extractor for one issuer layout.
pub trait Extractor: Send + Sync {
    /// Issuer whose receipts this extractor reads.
    fn issuer(&self) -> Issuer;

    /// Where the text comes from.
    fn text_policy(&self) -> TextPolicy {
        TextPolicy::TextLayer
    }

    /// Pages of text layer to read.
    fn max_pages(&self) -> usize {
        2
    }

    /// Wording that proves the transfer completed on this issuer's receipts.
    fn status_vocabulary(&self) -> StatusVocabulary {
        StatusVocabulary::NONE
    }

    /// Status of the receipt under this issuer's vocabulary.
    fn status(&self, text: &ReceiptText<'_>) -> StatusOutcome {
        classify_status(&text.normalized, &self.status_vocabulary())
    }

    /// Extract the canonical fields.
    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord>;
}
