//! Albaraka Türk receipts.
//!
//! Mostly scanned, so text comes from OCR of the first page when an engine
//! is available. Dates, receipt and reference numbers are read from the
//! normalized text, which absorbs OCR casing and diacritic noise.

use std::cmp::Reverse;

use lazy_static::lazy_static;
use regex::Regex;

use crate::acquire::TextPolicy;
use crate::extract::rules::{
    capture, extract_datetime, format_amount, largest_amount, name_from_capture, ocr_iban,
    pick_receiver_iban, window,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref SENDER: Regex =
        Regex::new(r"(?i)SAYIN\s+HES.{0,12}\s*SAH[İI]B[İI]\s*[:\-]?\s*([^\n]+)").unwrap();
    static ref RECEIVER: Regex = Regex::new(r"(?i)Al[ıi]c[ıi]\s+Ad[ıi]\s*[:\-]?\s*([^\n]+)").unwrap();
    static ref SENDER_IBAN: Regex = Regex::new(r"(?i)\bIBAN\s*[:\-]?\s*(TR[0-9\s]{20,})").unwrap();
    static ref RECEIVER_IBAN: Regex = Regex::new(
        r"(?i)Al[ıi]c[ıi]\s+Hesap\s*/\s*I?BA\s*N\s+No\s*[:\-]?\s*(TR[0-9\s]{20,})"
    ).unwrap();
    static ref RECEIVER_BANK: Regex = Regex::new(r"(?i)al[ıi]c[ıi] banka").unwrap();
    static ref AMOUNT: Regex = Regex::new(r"(?i)Tutar\s*[:\-]?\s*([0-9.,]+)\s*(?:TRY|TL)\b").unwrap();

    // Normalized-text patterns, most specific label first.
    static ref TIME_LABELS: Vec<Regex> = [
        r"islem tarihi",
        r"duzenleme tarihi",
        r"\btarih\b",
        r"\bsaat\b",
    ]
    .iter()
    .map(|label| {
        Regex::new(&format!(
            r"{label}\s*[:\-]?\s*(\d{{2}}[./-]\d{{2}}[./-]\d{{4}}\s+\d{{2}}:\d{{2}}:\d{{2}})"
        ))
        .unwrap()
    })
    .collect();
    static ref RECEIPT_NO: Regex = Regex::new(
        r"(?:dekont\s*no(?:\s*/\s*fis\s*no)?|fis\s*no)\s*[:\-]?\s*(\d{3,20}(?:\s*/\s*\d{2,20})?)"
    ).unwrap();
    static ref REFERENCE_LABEL: Regex =
        Regex::new(r"(?:referans\s*no|sorgu\s*no|islem\s*no)\s*[:\-]?\s*").unwrap();
    static ref LONG_NUMBER: Regex = Regex::new(r"\b\d{6,20}\b").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[
    &["isleminiz gerceklestirilmistir"],
    &["dekont", "albaraka"],
]);

pub struct AlbarakaExtractor;

fn receiver_iban(raw: &str, sender_iban: Option<&str>) -> Option<String> {
    let labeled = capture(&RECEIVER_IBAN, raw).and_then(|v| ocr_iban(&v));
    match labeled {
        Some(iban) if sender_iban != Some(iban.as_str()) => Some(iban),
        _ => pick_receiver_iban(raw, Some(&RECEIVER_BANK), sender_iban),
    }
}

fn amount(raw: &str) -> Option<String> {
    capture(&AMOUNT, raw)
        .and_then(|a| format_amount(&a))
        .or_else(|| largest_amount(raw))
}

fn transaction_time(normalized: &str) -> Option<String> {
    TIME_LABELS
        .iter()
        .find_map(|re| capture(re, normalized))
        .and_then(|v| extract_datetime(&v))
        .or_else(|| extract_datetime(normalized))
}

fn receipt_no(normalized: &str) -> Option<String> {
    capture(&RECEIPT_NO, normalized).map(|v| v.replace(' ', ""))
}

/// Longest number after the first reference label, else in the whole text.
fn transaction_ref(normalized: &str) -> Option<String> {
    let region = REFERENCE_LABEL
        .find(normalized)
        .map(|m| window(normalized, m.end(), 120))
        .unwrap_or(normalized);
    longest_number(region).or_else(|| longest_number(normalized))
}

fn longest_number(text: &str) -> Option<String> {
    LONG_NUMBER
        .find_iter(text)
        .map(|m| m.as_str())
        .min_by_key(|number| Reverse(number.len()))
        .map(str::to_string)
}

impl Extractor for AlbarakaExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Albaraka
    }

    fn text_policy(&self) -> TextPolicy {
        TextPolicy::OcrPreferred
    }

    fn max_pages(&self) -> usize {
        1
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let normalized = text.normalized.as_ref();
        let sender_iban = capture(&SENDER_IBAN, raw).and_then(|v| ocr_iban(&v));

        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: name_from_capture(&SENDER, raw),
            receiver_name: name_from_capture(&RECEIVER, raw),
            receiver_iban: receiver_iban(raw, sender_iban.as_deref()),
            sender_iban,
            amount: amount(raw),
            transaction_time: transaction_time(normalized),
            receipt_no: receipt_no(normalized),
            transaction_ref: transaction_ref(normalized),
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = r"ALBARAKA TÜRK KATILIM BANKASI A.Ş.
DEKONT
SAYIN HESAP SAHİBİ : MURAT GÜNEŞ
IBAN : TR12 0020 3000 0000 0012 3456 78
Alıcı Adı : SİBEL UÇAR
Alıcı Banka : ZİRAAT BANKASI
Alıcı Hesap/IBAN No : TR33 0006 1005 1978 6457 8413 26
Tutar : 41.424,00 TRY
İşlem Tarihi : 09.02.2026 21:27:56
Dekont No/Fiş No : 1588191/156381
Sorgu No : 4081697";

    #[test]
    fn test_receipt() {
        let record = AlbarakaExtractor.extract(&ReceiptText::new(RECEIPT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("MURAT GÜNEŞ"));
        assert_eq!(record.sender_iban.as_deref(), Some("TR120020300000000012345678"));
        assert_eq!(record.receiver_name.as_deref(), Some("SİBEL UÇAR"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("41.424,00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("09.02.2026 21:27:56"));
        assert_eq!(record.receipt_no.as_deref(), Some("1588191/156381"));
        assert_eq!(record.transaction_ref.as_deref(), Some("4081697"));
    }

    #[test]
    fn test_reads_ocr_of_first_page() {
        assert_eq!(AlbarakaExtractor.text_policy(), TextPolicy::OcrPreferred);
        assert_eq!(AlbarakaExtractor.max_pages(), 1);
    }

    #[test]
    fn test_longest_reference_wins() {
        assert_eq!(
            transaction_ref("islem no : 123456 ve 12345678").as_deref(),
            Some("12345678")
        );
        assert_eq!(transaction_ref("no label 7654321").as_deref(), Some("7654321"));
    }

    #[test]
    fn test_first_of_equally_long_references() {
        assert_eq!(longest_number("111111 222222 333").as_deref(), Some("111111"));
    }
}
