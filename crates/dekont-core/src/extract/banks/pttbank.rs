//! PTT Bank receipts: one `Label : value` row per field.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, extract_datetime, iban_in_value, largest_amount, line_after_exact, non_blank_lines,
    row_value,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::normalize::normalize;
use crate::status::StatusVocabulary;

lazy_static! {
    static ref STAMP: Regex =
        Regex::new(r"(\d{2})[/.](\d{2})[/.](\d{4})\s*-?\s*(\d{2}):(\d{2})").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[&["hesabinizdan", "cekilmistir"]]);

pub struct PttBankExtractor;

fn stamp(value: &str) -> Option<String> {
    let caps = STAMP.captures(value)?;
    extract_datetime(&format!(
        "{}.{}.{} {}:{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
    ))
}

/// The labeled transaction date, else the "... tarihinde oluşturulmuştur" footer.
fn transaction_time(lines: &[&str]) -> Option<String> {
    row_value(lines, "İşlem Tarihi")
        .and_then(|v| stamp(&v))
        .or_else(|| {
            lines
                .iter()
                .filter(|line| normalize(line).contains("tarihinde olusturulmustur"))
                .find_map(|line| stamp(line))
        })
}

impl Extractor for PttBankExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::PttBank
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let lines = non_blank_lines(raw);

        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: line_after_exact(raw, "SAYIN").and_then(|v| accept_name(&v)),
            receiver_name: row_value(&lines, "Alıcı Adı").and_then(|v| accept_name(&v)),
            receiver_iban: row_value(&lines, "Alıcı Iban").and_then(|v| iban_in_value(&v)),
            amount: row_value(&lines, "Tutar")
                .and_then(|v| largest_amount(&v))
                .or_else(|| largest_amount(raw)),
            transaction_time: transaction_time(&lines),
            receipt_no: row_value(&lines, "İşlem Sıra No"),
            ..FieldRecord::default()
        })
    }
}
