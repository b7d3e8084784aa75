//! UPT money transfer receipts (English labels, single page).

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    capture, extract_datetime, format_amount, iban_in_value, largest_amount, name_from_capture,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref ORIGINATOR: Regex =
        Regex::new(r"(?i)Originator\s+Name\s+Surname\s*:?\s*([^\n]+)").unwrap();
    static ref RECEIVER: Regex =
        Regex::new(r"(?i)Receiver\s+Name\s+Surname\s*:?\s*([^\n]+)").unwrap();
    static ref RECEIVER_IBAN: Regex =
        Regex::new(r"(?i)Receiver\s+IBAN\s*:?\s*(TR[0-9 ]{24,40})").unwrap();
    static ref AMOUNT: Regex =
        Regex::new(r"(?i)Transaction\s+Amount\s*:?\s*([\d.,]+)\s*(?:TL|TRY)").unwrap();
    static ref ISSUED_AT: Regex = Regex::new(
        r"(?i)(?:Issue|Transaction)\s+Date\s*:?\s*(\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2}(?::\d{2})?)"
    ).unwrap();
    static ref RECEIPT_NO: Regex = Regex::new(r"(?i)Receipt\s+No\s*:?\s*([A-Z0-9-]+)").unwrap();
    static ref TRANSACTION_NO: Regex = Regex::new(
        r"(?i)Transaction\s+(?:Reference\s+)?Number\s*:?\s*(\d+)"
    ).unwrap();
}

// Completion by title: a numbered receipt is issued for completed transfers
// only, and the page prints no other completion wording.
const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[&["receipt no"]]);

pub struct UptExtractor;

impl Extractor for UptExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Upt
    }

    fn max_pages(&self) -> usize {
        1
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: name_from_capture(&ORIGINATOR, raw),
            receiver_name: name_from_capture(&RECEIVER, raw),
            receiver_iban: capture(&RECEIVER_IBAN, raw).and_then(|v| iban_in_value(&v)),
            amount: capture(&AMOUNT, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: capture(&ISSUED_AT, raw).and_then(|t| extract_datetime(&t)),
            receipt_no: capture(&RECEIPT_NO, raw),
            transaction_ref: capture(&TRANSACTION_NO, raw),
            ..FieldRecord::default()
        })
    }
}
