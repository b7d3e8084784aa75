//! DenizBank FAST receipts: `Label value` rows without separators.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    capture, extract_datetime, format_amount, iban_in_value, largest_amount, name_from_capture,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref SENDER: Regex = Regex::new(r"(?im)^[ \t]*Ad[ıi]\s+Soyad[ıi][ \t]+([^\n]+)").unwrap();
    static ref SENDER_IBAN: Regex = Regex::new(r"(?im)^[ \t]*IBAN\s+(TR[0-9 ]{20,})").unwrap();
    static ref RECEIVER: Regex =
        Regex::new(r"(?i)Al[ıi]c[ıi]\s+Ad[ıi]\s+Soyad[ıi][ \t]+([^\n]+)").unwrap();
    static ref RECEIVER_IBAN: Regex =
        Regex::new(r"(?i)Al[ıi]c[ıi]\s+IBAN\s+(TR[0-9 ]{20,})").unwrap();
    static ref AMOUNT: Regex = Regex::new(r"(?i)\bTutar\s+([0-9.,]+)\s*TL").unwrap();
    static ref TIME: Regex = Regex::new(
        r"(?i)[İI]şlem\s+Tarihi\s+(\d{2}\.\d{2}\.\d{4}\s+\d{2}:\d{2}:\d{2})"
    ).unwrap();
    static ref REFERENCE_INFO: Regex = Regex::new(
        r"(?i)Referans\s+Bilgisi\s*:\s*(\d{8}\s*-\s*\d{4}\s*-\s*\d+)"
    ).unwrap();
    static ref FAST_QUERY: Regex =
        Regex::new(r"(?i)FAST\s+Sorgu\s+Numaras[ıi]\s*:\s*(\d+)").unwrap();
}

// The receipt title is the only completion evidence these layouts carry:
// a page titled "Dekont" is issued for completed transfers only.
const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[&["dekont"]]);

pub struct DenizBankExtractor;

impl Extractor for DenizBankExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::DenizBank
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: name_from_capture(&SENDER, raw),
            sender_iban: capture(&SENDER_IBAN, raw).and_then(|v| iban_in_value(&v)),
            receiver_name: name_from_capture(&RECEIVER, raw),
            receiver_iban: capture(&RECEIVER_IBAN, raw).and_then(|v| iban_in_value(&v)),
            amount: capture(&AMOUNT, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: capture(&TIME, raw).and_then(|t| extract_datetime(&t)),
            receipt_no: capture(&REFERENCE_INFO, raw),
            transaction_ref: capture(&FAST_QUERY, raw),
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = r"DenizBank A.Ş.
Dekont
Adı Soyadı ORHAN KURT
IBAN TR12 0013 4000 0012 3456 7890 12
Alıcı Adı Soyadı LEYLA ÖZ
Alıcı IBAN TR33 0006 1005 1978 6457 8413 26
Tutar 4.100,00 TL
Masraf 0,00 TL
İşlem Tarihi 11.10.2026 12:00:05
Referans Bilgisi : 20261011 - 1200 - 778
FAST Sorgu Numarası: 5566778899";

    #[test]
    fn test_fast_receipt() {
        let record = DenizBankExtractor.extract(&ReceiptText::new(RECEIPT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("ORHAN KURT"));
        assert_eq!(record.sender_iban.as_deref(), Some("TR120013400000123456789012"));
        assert_eq!(record.receiver_name.as_deref(), Some("LEYLA ÖZ"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("4.100,00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("11.10.2026 12:00:05"));
        assert_eq!(record.receipt_no.as_deref(), Some("20261011 - 1200 - 778"));
        assert_eq!(record.transaction_ref.as_deref(), Some("5566778899"));
    }

    #[test]
    fn test_receiver_row_is_not_the_sender() {
        let text = "Alıcı Adı Soyadı LEYLA ÖZ\n";
        let record = DenizBankExtractor.extract(&ReceiptText::new(text)).unwrap();
        assert_eq!(record.sender_name, None);
        assert_eq!(record.receiver_name.as_deref(), Some("LEYLA ÖZ"));
    }

    #[test]
    fn test_amount_row_with_colon() {
        let text = RECEIPT.replace("Tutar 4.100,00 TL", "Tutar : 4.100,00 TL");
        let record = DenizBankExtractor.extract(&ReceiptText::new(text)).unwrap();
        assert_eq!(record.amount.as_deref(), Some("4.100,00 TL"));
    }
}
