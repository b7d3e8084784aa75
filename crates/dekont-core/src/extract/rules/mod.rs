//! Rule-based field extractors shared by every receipt layout.

pub mod amounts;
pub mod dates;
pub mod iban;
pub mod labels;
pub mod names;
pub mod patterns;

pub use amounts::{
    amount_after, extract_amounts, format_amount, largest_amount, parse_amount, pick_amount,
    with_decimals,
    AmountCandidate, AmountExtractor,
};
pub use dates::{
    datetime_after, extract_date, extract_datetime, first_date_and_time, DateTimeExtractor,
    Timestamp,
};
pub use iban::{
    all_ibans, canonical_iban, extract_iban, format_iban, iban_after, iban_in_value, iban_near, is_masked,
    ocr_iban, pick_receiver_iban, validate_iban, IbanExtractor,
};
pub use labels::{
    capture, capture_all, clean_value, inline_value, line_after_exact, next_line_value,
    non_blank_lines, row_value, value_after, values_after, window,
};
pub use names::{accept_name, clean_name, looks_like_name, name_after, name_from_capture};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched field value with its confidence.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
