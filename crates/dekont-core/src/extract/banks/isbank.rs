//! Türkiye İş Bankası receipts.
//!
//! FAST receipts open with the sender's name on the second line; Havale
//! receipts print it under a "Gönderici Hesap" block heading.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, capture, extract_datetime, extract_iban, format_amount, largest_amount,
    non_blank_lines,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::normalize::normalize;
use crate::status::StatusVocabulary;

lazy_static! {
    static ref TRANSFER_WORDS: Regex = Regex::new(r"(?i)\b(?:FAST|EFT|HAVALE)\b").unwrap();
    static ref RECEIVER_NAME: Regex = Regex::new(
        r"Al[ıi]c[ıi] [İIi]sim[\\/]?Unvan\s*:\s*([A-ZÇĞİÖŞÜa-zçğıöşü\s.]+)"
    ).unwrap();
    static ref RECEIVER_ACCOUNT: Regex =
        Regex::new(r"Al[ıi]c[ıi] Hesap\s*:\s*([A-ZÇĞİÖŞÜa-zçğıöşü\s.]+)").unwrap();
    static ref NAME_STOP: Regex = Regex::new(r"\b(?:TR|BSMV)\b").unwrap();
    static ref AMOUNT: Regex = Regex::new(
        r"(?i)(?:[İI]şlem|Havale|EFT|FAST)\s+Tutar[ıi]\s*:?\s*(\d{1,3}(?:\.\d{3})*,\d{2})\s*(?:TRY|TL)"
    ).unwrap();
    static ref STAMP: Regex = Regex::new(r"\d{2}\.\d{2}\.\d{4}\s+\d{2}:\d{2}").unwrap();
    static ref QUERY_NO: Regex =
        Regex::new(r"(?i)Sorgu Numaras[ıi]\s*:\s*([A-Z0-9]+)").unwrap();
    static ref DOCUMENT_NO: Regex = Regex::new(r"(?i)Belge No\s*:\s*([A-Z0-9]+)").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[
    &["isleminiz gerceklestirilmistir"],
    &["giden fast islemi"],
    &["para aktarma"],
    &["senaryo/dekont tipi : dekont"],
    &["senaryo dekont tipi"],
    &["dekont/eft"],
    &["dekont/fast"],
]);

pub struct IsbankExtractor;

/// A name candidate that is not a transfer heading.
fn party(line: &str) -> Option<String> {
    if TRANSFER_WORDS.is_match(line) {
        return None;
    }
    accept_name(line)
}

/// Line after the first line starting with `heading`; a junk line ends the search.
fn block_value(lines: &[&str], heading: &str) -> Option<String> {
    let start = lines
        .iter()
        .position(|line| normalize(line).starts_with(heading))?;
    lines.get(start + 1).and_then(|line| party(line))
}

fn sender_name(raw: &str) -> Option<String> {
    let lines = non_blank_lines(raw);
    lines
        .get(1)
        .and_then(|line| party(line))
        .or_else(|| block_value(&lines, "gonderici hesap"))
}

fn receiver_name(raw: &str) -> Option<String> {
    let value = RECEIVER_NAME
        .captures(raw)
        .or_else(|| RECEIVER_ACCOUNT.captures(raw))?
        .get(1)?
        .as_str();
    let end = NAME_STOP.find(value).map(|m| m.start()).unwrap_or(value.len());
    accept_name(&value[..end])
}

impl Extractor for IsbankExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Isbank
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let receipt_no = capture(&QUERY_NO, raw).or_else(|| capture(&DOCUMENT_NO, raw));

        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: sender_name(raw),
            receiver_name: receiver_name(raw),
            receiver_iban: extract_iban(raw),
            amount: capture(&AMOUNT, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: STAMP.find(raw).and_then(|m| extract_datetime(m.as_str())),
            transaction_ref: receipt_no.clone(),
            receipt_no,
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const FAST_RECEIPT: &str = r"TÜRKİYE İŞ BANKASI A.Ş.
HAKAN TUNÇ
Giden FAST İşlemi
Alıcı Isim\Unvan : PINAR GÜLER TR33 0006 1005 1978 6457 8413 26
İşlem Tutarı 1.999,90 TL
14.04.2026 08:45
Sorgu Numarası : 889900112";

    const HAVALE_RECEIPT: &str = r"TÜRKİYE İŞ BANKASI A.Ş.
HAVALE DEKONTU
Gönderici Hesap
SELİM KARA
Alıcı Hesap : NİL DEMİR TR33 0006 1005 1978 6457 8413 26
Havale Tutarı 75,00 TL
Belge No : AB1234";

    #[test]
    fn test_fast_receipt() {
        let record = IsbankExtractor.extract(&ReceiptText::new(FAST_RECEIPT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("HAKAN TUNÇ"));
        assert_eq!(record.receiver_name.as_deref(), Some("PINAR GÜLER"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("1.999,90 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("14.04.2026 08:45"));
        assert_eq!(record.receipt_no.as_deref(), Some("889900112"));
        assert_eq!(record.transaction_ref.as_deref(), Some("889900112"));
    }

    #[test]
    fn test_havale_block_sender() {
        let record = IsbankExtractor.extract(&ReceiptText::new(HAVALE_RECEIPT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Unknown);
        assert_eq!(record.sender_name.as_deref(), Some("SELİM KARA"));
        assert_eq!(record.receiver_name.as_deref(), Some("NİL DEMİR"));
        assert_eq!(record.amount.as_deref(), Some("75,00 TL"));
        assert_eq!(record.receipt_no.as_deref(), Some("AB1234"));
    }
}
