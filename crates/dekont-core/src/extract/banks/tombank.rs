//! TOM Bank receipts.
//!
//! Values follow their label on the next line or after a colon. The text
//! layer sometimes spaces out digits ("3 1 . 0 1 . 2 0 2 6  1 6 : 3 1"),
//! which the date parser tolerates.

use crate::extract::rules::{
    accept_name, extract_datetime, format_amount, largest_amount, non_blank_lines, row_value,
    window,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};

/// TOM Bank receipts carry no completion wording.
pub struct TomBankExtractor;

/// Labeled stamp, else the first stamp near the label, else anywhere.
fn transaction_time(lines: &[&str], normalized: &str) -> Option<String> {
    if let Some(value) = row_value(lines, "İşlem Tarihi").and_then(|v| extract_datetime(&v)) {
        return Some(value);
    }
    let near_label = ["islem tarihi", "islemtarihi"]
        .iter()
        .find_map(|label| normalized.find(label))
        .and_then(|idx| extract_datetime(window(normalized, idx, 120)));
    near_label.or_else(|| extract_datetime(normalized))
}

fn amount(value: &str) -> Option<String> {
    largest_amount(value).or_else(|| format_amount(value))
}

impl Extractor for TomBankExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::TomBank
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let lines = non_blank_lines(raw);
        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: row_value(&lines, "Gönderen Kişi").and_then(|v| accept_name(&v)),
            receiver_name: row_value(&lines, "Gönderilen Kişi").and_then(|v| accept_name(&v)),
            amount: row_value(&lines, "Tutar")
                .and_then(|v| amount(&v))
                .or_else(|| largest_amount(raw)),
            transaction_time: transaction_time(&lines, &text.normalized),
            receipt_no: row_value(&lines, "Sorgu Numarası"),
            transaction_ref: row_value(&lines, "İşlem Referansı"),
            ..FieldRecord::default()
        })
    }
}
