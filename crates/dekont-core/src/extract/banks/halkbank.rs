//! Halkbank outgoing transfer receipts.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    capture, extract_datetime, format_amount, iban_in_value, largest_amount, name_from_capture,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref SENDER: Regex = Regex::new(r"(?i)GÖNDEREN\s*:\s*([^\n]+)").unwrap();
    static ref RECEIVER: Regex = Regex::new(r"(?i)ALICI\s*:\s*([^\n]+)").unwrap();
    static ref RECEIVER_IBAN: Regex = Regex::new(r"(?i)ALICI\s+IBAN\s*:\s*(TR[\d ]+)").unwrap();
    static ref AMOUNT: Regex =
        Regex::new(r"(?i)[İI]ŞLEM\s+TUTARI\s*\(TL\)\s*:\s*([\d.,]+)").unwrap();
    static ref TIME: Regex = Regex::new(
        r"(?i)[İI]ŞLEM\s+TAR[İI]H[İI]\s*:\s*(\d{2}/\d{2}/\d{4}\s*-\s*\d{2}:\d{2})"
    ).unwrap();
    static ref QUERY_NO: Regex = Regex::new(r"(?i)SORGU\s+NO\s*:\s*(\d+)").unwrap();
    static ref BIMREF: Regex = Regex::new(r"(?i)B[İI]MREF[^:\n]*:\s*(M-[\d.\-]+)").unwrap();
}

// Outgoing transfer headings.
const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[
    &["giden fast"],
    &["giden eft"],
    &["giden havale"],
]);

pub struct HalkbankExtractor;

impl Extractor for HalkbankExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Halkbank
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: name_from_capture(&SENDER, raw),
            receiver_name: name_from_capture(&RECEIVER, raw),
            receiver_iban: capture(&RECEIVER_IBAN, raw).and_then(|v| iban_in_value(&v)),
            amount: capture(&AMOUNT, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: capture(&TIME, raw).and_then(|t| extract_datetime(&t)),
            receipt_no: capture(&QUERY_NO, raw),
            transaction_ref: capture(&BIMREF, raw),
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = r"T. HALK BANKASI A.Ş.
GİDEN FAST
GÖNDEREN : ECE ÇAKIR
ALICI : ONUR SEZER
ALICI IBAN : TR33 0006 1005 1978 6457 8413 26
İŞLEM TUTARI (TL) : 320,75
İŞLEM TARİHİ : 05/03/2026 - 18:07
SORGU NO : 6677889900
BİMREF NO : M-20260305-1807.44";

    #[test]
    fn test_outgoing_fast() {
        let record = HalkbankExtractor.extract(&ReceiptText::new(RECEIPT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("ECE ÇAKIR"));
        assert_eq!(record.receiver_name.as_deref(), Some("ONUR SEZER"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("320,75 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("05.03.2026 18:07"));
        assert_eq!(record.receipt_no.as_deref(), Some("6677889900"));
        assert_eq!(record.transaction_ref.as_deref(), Some("M-20260305-1807.44"));
    }

    #[test]
    fn test_status_unknown_without_direction() {
        let text = RECEIPT.replace("GİDEN FAST", "FAST");
        let record = HalkbankExtractor.extract(&ReceiptText::new(text)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Unknown);
    }
}
