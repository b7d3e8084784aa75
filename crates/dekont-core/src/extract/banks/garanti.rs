//! Garanti BBVA receipts, FAST and Havale alike.
//!
//! The sequence number doubles as the transaction stamp:
//! `SIRA NO : 2026-01-31-20.39.54.283610` is 31.01.2026 20:39.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, capture, extract_date, extract_datetime, format_amount, iban_in_value,
    largest_amount,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::normalize::collapse_whitespace;
use crate::status::StatusVocabulary;

lazy_static! {
    static ref SAYIN: Regex = Regex::new(r"(?i)SAYIN\s*\n\s*([^\n]+)").unwrap();
    static ref SAYIN_FLAT: Regex =
        Regex::new(r"(?i)SAYIN\s+(.+?)\s+(?:FAST\s+REF\s+NO|ALACAKLI|IBAN)").unwrap();
    static ref CREDITOR: Regex = Regex::new(r"(?i)ALACAKLI\s*:\s*([^\n]+)").unwrap();
    // Havale: "ALACAKLI HESAP : 00765 / 6853696 FURKAN YILDIZ"
    static ref CREDITOR_ACCOUNT: Regex =
        Regex::new(r"(?i)ALACAKLI\s+HESAP\s*:\s*[0-9/\s]+\s*([^\n]+)").unwrap();
    static ref CREDITOR_IBAN: Regex =
        Regex::new(r"(?i)ALACAKLI\s+IBAN\s*:\s*(TR(?:\s*\d){24})").unwrap();
    static ref AMOUNT: Regex = Regex::new(r"(?i)TUTAR\s*:\s*-\s*([0-9.,]+)\s*TL").unwrap();
    static ref SEQUENCE_STAMP: Regex = Regex::new(
        r"(?i)SIRA\s+NO\s*:\s*(\d{4})-(\d{2})-(\d{2})-(\d{2})\.(\d{2})"
    ).unwrap();
    static ref DATE_ONLY: Regex =
        Regex::new(r"[İI]ŞLEM\s+TAR[İI]H[İI]\s*:\s*(\d{2})/(\d{2})/(\d{4})").unwrap();
    static ref SEQUENCE: Regex = Regex::new(r"(?i)SIRA\s+NO\s*:\s*([0-9.:\-]+)").unwrap();
    static ref FAST_REF: Regex = Regex::new(r"(?i)FAST\s+REF\s+NO\s*:\s*([0-9]+)").unwrap();
}

// The receipt title is the only completion evidence these layouts carry:
// a page titled "Dekont" is issued for completed transfers only.
const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[&["dekont"]]);

pub struct GarantiExtractor;

fn sender_name(raw: &str) -> Option<String> {
    capture(&SAYIN, raw)
        .or_else(|| capture(&SAYIN_FLAT, &collapse_whitespace(raw)))
        .and_then(|v| accept_name(&v))
}

fn receiver_name(raw: &str) -> Option<String> {
    capture(&CREDITOR, raw)
        .or_else(|| capture(&CREDITOR_ACCOUNT, raw))
        .and_then(|v| accept_name(&v))
}

fn transaction_time(raw: &str) -> Option<String> {
    if let Some(caps) = SEQUENCE_STAMP.captures(raw) {
        return extract_datetime(&format!(
            "{}.{}.{} {}:{}",
            &caps[3], &caps[2], &caps[1], &caps[4], &caps[5]
        ));
    }
    let caps = DATE_ONLY.captures(raw)?;
    extract_date(&format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]))
}

impl Extractor for GarantiExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Garanti
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: sender_name(raw),
            receiver_name: receiver_name(raw),
            receiver_iban: capture(&CREDITOR_IBAN, raw).and_then(|v| iban_in_value(&v)),
            amount: capture(&AMOUNT, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: transaction_time(raw),
            receipt_no: capture(&SEQUENCE, raw),
            transaction_ref: capture(&FAST_REF, raw),
            ..FieldRecord::default()
        })
    }
}
