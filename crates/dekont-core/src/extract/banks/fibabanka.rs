//! Fibabanka bilingual e-receipts.
//!
//! The receiver only appears inside the description ("ALICI: NAME - ...")
//! and the receipt prints a date without a time of day.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    capture, extract_date, format_amount, iban_in_value, largest_amount, name_from_capture,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref FULL_NAME: Regex = Regex::new(r"(?i)FULL NAME\s+([^\n]+)").unwrap();
    static ref NAME_HEADING: Regex = Regex::new(r"(?i)AD[İI] SOYAD[İI][^\n]*\n\s*([^\n]+)").unwrap();
    static ref RECEIVER: Regex = Regex::new(r"(?i)ALICI:\s*([^\-\n]+)").unwrap();
    static ref RECEIVER_IBAN: Regex = Regex::new(r"(?i)ALICI\s*IBAN\s*:\s*(TR[0-9 ]{10,})").unwrap();
    static ref DEBIT: Regex = Regex::new(r"\(-\)\s*TRY\s*([0-9.,]+)").unwrap();
    static ref DATE: Regex =
        Regex::new(r"(?i)TAR[İI]H\s*/\s*DATE\s*(\d{2}/\d{2}/\d{4})").unwrap();
    static ref RECEIPT_NO: Regex =
        Regex::new(r"(?i)DEKONT NO\s*/\s*RECEIPT NUMBER\s*([0-9-]+)").unwrap();
    static ref PRODUCT_REF: Regex =
        Regex::new(r"(?i)(?:Ürün Referansı|Urun Referansi)\s*:\s*(\d+)").unwrap();
}

// The receipt title is the only completion evidence these layouts carry:
// a page titled "Dekont" is issued for completed transfers only.
const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[&["dekont"]]);

pub struct FibabankaExtractor;

impl Extractor for FibabankaExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Fibabanka
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
            sender_name: name_from_capture(&FULL_NAME, raw)
                .or_else(|| name_from_capture(&NAME_HEADING, raw)),
            receiver_name: name_from_capture(&RECEIVER, raw),
            receiver_iban: capture(&RECEIVER_IBAN, raw).and_then(|v| iban_in_value(&v)),
            amount: capture(&DEBIT, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: capture(&DATE, raw).and_then(|d| extract_date(&d)),
            receipt_no: capture(&RECEIPT_NO, raw),
            transaction_ref: capture(&PRODUCT_REF, raw),
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = r"FIBABANKA A.Ş.
E - DEKONT
FULL NAME SERKAN ÖZTÜRK
TARİH / DATE 11/05/2026
DEKONT NO / RECEIPT NUMBER 2026-0511-4471
AÇIKLAMA: ALICI: MELTEM ŞAHİN - KİRA ÖDEMESİ
ALICI IBAN : TR33 0006 1005 1978 6457 8413 26
(-)TRY 30,000.00
Ürün Referansı : 5566778899";

    #[test]
    fn test_receipt() {
        let record = FibabankaExtractor.extract(&ReceiptText::new(RECEIPT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("SERKAN ÖZTÜRK"));
        assert_eq!(record.receiver_name.as_deref(), Some("MELTEM ŞAHİN"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("30,000.00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("11.05.2026"));
        assert_eq!(record.receipt_no.as_deref(), Some("2026-0511-4471"));
        assert_eq!(record.transaction_ref.as_deref(), Some("5566778899"));
    }

    #[test]
    fn test_sender_under_name_heading() {
        let text = "FIBABANKA\nADI SOYADI / NAME SURNAME\nSERKAN ÖZTÜRK\n";
        let record = FibabankaExtractor.extract(&ReceiptText::new(text)).unwrap();
        assert_eq!(record.sender_name.as_deref(), Some("SERKAN ÖZTÜRK"));
        assert_eq!(record.tr_status, StatusOutcome::Unknown);
    }
}
