//! TEB receipts, interbank and internal.
//!
//! Interbank receipts label the receiver ("Alacaklı Adı", "Alacaklı Hesap").
//! Internal ones print two "Hesap Sahibi" owners and two IBANs, sender first.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, all_ibans, capture, capture_all, extract_datetime, iban_in_value, largest_amount,
    with_decimals,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    // Often mid-line, after "Müşteri Numarası:".
    static ref OWNER: Regex = Regex::new(r"(?i)Hesap\s+Sahibi\s*:\s*([^\n]+)").unwrap();
    static ref CREDITOR: Regex = Regex::new(r"(?i)Alacakl[ıi]\s+Ad[ıi]\s*:\s*([^\n]+)").unwrap();
    static ref CREDITOR_IBAN: Regex =
        Regex::new(r"(?i)Alacakl[ıi]\s+Hesap\s*:\s*(TR\s*(?:\d\s*){24})").unwrap();
    static ref ACCOUNT_TOTAL: Regex = Regex::new(
        r"(?i)Hesaptan\s+toplam\s+TL\.?\s*(\d{1,3}(?:\.\d{3})*(?:,\d{2})?)"
    ).unwrap();
    static ref TL_FIRST: Regex =
        Regex::new(r"(?i)\bTL\s*(\d{1,3}(?:\.\d{3})*(?:,\d{2})?)").unwrap();
    static ref TIME: Regex = Regex::new(
        r"(?i)Tarih-Saat\s*:\s*(\d{2})/(\d{2})/(\d{4})\s+(\d{2})[.:](\d{2})"
    ).unwrap();
    static ref OPERATION_NO: Regex = Regex::new(r"(?i)[İI]şlem\s+No\s*:\s*(\d{5,})").unwrap();
    static ref FAST_NO: Regex = Regex::new(r"(?i)FAST\s+No\s*:\s*(\d{6,})").unwrap();
}

const VOCABULARY: StatusVocabulary =
    StatusVocabulary::new(&[&["elektronik olarak onaylanmis"]]);

pub struct TebExtractor;

fn receiver_iban(raw: &str) -> Option<String> {
    if let Some(iban) = capture(&CREDITOR_IBAN, raw).and_then(|v| iban_in_value(&v)) {
        return Some(iban);
    }
    let ibans = all_ibans(raw);
    ibans.get(1).or_else(|| ibans.first()).cloned()
}

/// Whole-lira totals ("TL. 1.500,-") get their decimals back.
fn amount(raw: &str) -> Option<String> {
    capture(&ACCOUNT_TOTAL, raw)
        .or_else(|| capture(&TL_FIRST, raw))
        .map(|v| format!("{} TL", with_decimals(&v)))
        .or_else(|| largest_amount(raw))
}

fn transaction_time(raw: &str) -> Option<String> {
    let caps = TIME.captures(raw)?;
    extract_datetime(&format!(
        "{}.{}.{} {}:{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
    ))
}

impl Extractor for TebExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Teb
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let owners: Vec<String> = capture_all(&OWNER, raw)
            .iter()
            .filter_map(|v| accept_name(v))
            .collect();

        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: owners.first().cloned(),
            receiver_name: capture(&CREDITOR, raw)
                .and_then(|v| accept_name(&v))
                .or_else(|| owners.get(1).cloned()),
            receiver_iban: receiver_iban(raw),
            amount: amount(raw),
            transaction_time: transaction_time(raw),
            receipt_no: capture(&OPERATION_NO, raw),
            transaction_ref: capture(&FAST_NO, raw),
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const INTERBANK: &str = r"TÜRK EKONOMİ BANKASI A.Ş.
Müşteri Numarası: 1234 Hesap Sahibi: KADİR POLAT
TR12 0003 2000 0000 0012 3456 78
Alacaklı Adı: GİZEM ERDEM
Alacaklı Hesap: TR33 0006 1005 1978 6457 8413 26
Hesaptan toplam TL. 1.500,-
Tarih-Saat : 07/07/2026 11.25
İşlem No : 7788990
FAST No : 123987456
Bu dekont elektronik olarak onaylanmıştır.";

    const INTERNAL: &str = r"TEB
Hesap Sahibi: KADİR POLAT
TR12 0003 2000 0000 0012 3456 78
Hesap Sahibi: GİZEM ERDEM
TR33 0006 1005 1978 6457 8413 26
TL 250,00";

    #[test]
    fn test_interbank_receipt() {
        let record = TebExtractor.extract(&ReceiptText::new(INTERBANK)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("KADİR POLAT"));
        assert_eq!(record.receiver_name.as_deref(), Some("GİZEM ERDEM"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("1.500,00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("07.07.2026 11:25"));
        assert_eq!(record.receipt_no.as_deref(), Some("7788990"));
        assert_eq!(record.transaction_ref.as_deref(), Some("123987456"));
    }

    #[test]
    fn test_internal_receipt_uses_second_owner() {
        let record = TebExtractor.extract(&ReceiptText::new(INTERNAL)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Unknown);
        assert_eq!(record.sender_name.as_deref(), Some("KADİR POLAT"));
        assert_eq!(record.receiver_name.as_deref(), Some("GİZEM ERDEM"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("250,00 TL"));
        assert_eq!(record.transaction_ref, None);
    }
}
