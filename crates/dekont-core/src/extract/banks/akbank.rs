//! Akbank receipts.
//!
//! Both parties are printed on one line, each after its own
//! "Adı Soyadı/Unvan :" label: sender first, receiver second.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, capture, extract_datetime, format_amount, iban_in_value, largest_amount,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref PARTY_LABEL: Regex =
        Regex::new(r"(?i)Ad[ıi]\s+Soyad[ıi]/Unvan\s*:\s*").unwrap();
    static ref RECEIVER_ACCOUNT: Regex =
        Regex::new(r"(?i)Alacakl[ıi]\s+Hesap\s+No\s*:\s*(TR[0-9 ]{20,})").unwrap();
    // The sender account stands alone on its line.
    static ref SENDER_ACCOUNT: Regex = Regex::new(r"(?m)^[ \t]*(TR[0-9 ]{20,})[ \t]*$").unwrap();
    // "ŞCH 0,00 TL 50.000,00 TL": fee column, then the transferred amount.
    static ref FEE_ROW: Regex = Regex::new(
        r"(?im)^\s*ŞCH\s+[0-9.,]+\s*TL\s+([0-9.,]+)\s*TL\s*$"
    ).unwrap();
    static ref TIME: Regex = Regex::new(
        r"(?i)[İI]şlem\s+Tarihi/Saati\s*:\s*(\d{2}\.\d{2}\.\d{4}\s+\d{2}:\d{2}:\d{2})"
    ).unwrap();
    static ref RECEIPT_NO: Regex = Regex::new(r"(\d{5,}\s*/\s*\d{3,}\s*/)").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[&["dekont", "akbank"]]);

pub struct AkbankExtractor;

/// Every "Adı Soyadı/Unvan" value, each cut at the next label or line end.
fn party_names(raw: &str) -> Vec<String> {
    let labels: Vec<_> = PARTY_LABEL.find_iter(raw).collect();
    labels
        .iter()
        .enumerate()
        .filter_map(|(i, label)| {
            let rest = &raw[label.end()..];
            let line_end = rest.find('\n').unwrap_or(rest.len());
            let next_label = labels
                .get(i + 1)
                .map(|next| next.start() - label.end())
                .unwrap_or(usize::MAX);
            accept_name(&rest[..line_end.min(next_label)])
        })
        .collect()
}

impl Extractor for AkbankExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Akbank
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let mut names = party_names(raw).into_iter();

        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: names.next(),
            receiver_name: names.next(),
            sender_iban: capture(&SENDER_ACCOUNT, raw).and_then(|v| iban_in_value(&v)),
            receiver_iban: capture(&RECEIVER_ACCOUNT, raw).and_then(|v| iban_in_value(&v)),
            amount: capture(&FEE_ROW, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: capture(&TIME, raw).and_then(|t| extract_datetime(&t)),
            receipt_no: capture(&RECEIPT_NO, raw),
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = r"AKBANK T.A.Ş.
DEKONT
TR12 0004 6000 1188 8000 1234 56
Adı Soyadı/Unvan : SERKAN YÜCEL Adı Soyadı/Unvan : NUR AYDIN
Alacaklı Hesap No : TR33 0006 1005 1978 6457 8413 26
İşlem Tarihi/Saati : 09.09.2026 17:20:45
30940173 / 458578 /
ŞCH 0,00 TL 50.000,00 TL";

    #[test]
    fn test_parties_on_one_line() {
        let record = AkbankExtractor.extract(&ReceiptText::new(RECEIPT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("SERKAN YÜCEL"));
        assert_eq!(record.receiver_name.as_deref(), Some("NUR AYDIN"));
        assert_eq!(record.sender_iban.as_deref(), Some("TR120004600011888000123456"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("50.000,00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("09.09.2026 17:20:45"));
        assert_eq!(record.receipt_no.as_deref(), Some("30940173 / 458578 /"));
    }

    #[test]
    fn test_largest_amount_without_fee_row() {
        let text = "AKBANK\nMasraf 12,50 TL\nTutar 1.250,00 TL\n";
        let record = AkbankExtractor.extract(&ReceiptText::new(text)).unwrap();
        assert_eq!(record.amount.as_deref(), Some("1.250,00 TL"));
        assert_eq!(record.tr_status, StatusOutcome::Unknown);
    }
}
