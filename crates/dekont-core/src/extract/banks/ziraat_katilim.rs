//! Ziraat Katılım receipts.
//!
//! These are image receipts read through OCR of the first page, so labels
//! arrive damaged ("Alic1 Ach :Ahmet Yaprak") and IBAN digits may come back
//! as look-alike letters. The sender is masked on the receipt and never
//! reported.

use lazy_static::lazy_static;
use regex::Regex;

use crate::acquire::TextPolicy;
use crate::extract::rules::patterns::AMOUNT_BARE;
use crate::extract::rules::{
    capture, clean_value, extract_datetime, format_amount, looks_like_name, ocr_iban, parse_amount,
    window,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    // OCR reads "Alıcı Adı" as "Alic1 Ach", "4lici Adi", ...
    static ref RECEIVER_DAMAGED: Regex =
        Regex::new(r"(?i)^\s*(?:4|A)lic[ıi1]\s+A\w{1,5}\s*[:=\-]\s*(.{2,120}?)\s*$").unwrap();
    static ref RECEIVER_PLAIN: Regex =
        Regex::new(r"(?i)^\s*(?:4|A)lic[ıi1]\s+Ad[ıi1]?\w{0,3}\s*[:=\-]?\s*(.{2,120}?)\s*$").unwrap();
    static ref LEADING_JUNK: Regex = Regex::new(r"^[^\p{L}]+").unwrap();
    static ref GLUED_LABEL: Regex =
        Regex::new(r"\b(?:IBAN|Iban|Tutar|Dekont|Sorgu|Islem|İşlem|Vale|Val[oö]r)\b").unwrap();
    static ref NON_NAME_CHARS: Regex = Regex::new(r"[^\p{L}'.\- ]+").unwrap();

    static ref AMOUNT: Regex = Regex::new(
        r"(?im)^\s*Tutar\s*[:\-]?\s*(\d{1,3}(?:[.\s]\d{3})*[,.]\d{2})\s*(?:TRY|TL)\b"
    ).unwrap();
    static ref TIME: Regex = Regex::new(
        r"(?im)^\s*(?:[İI]ŞLEM|ISLEM|D[ÜU]ZENLEME)\s+TAR[İI]H[İI]\s*[:=\-]?\s*(\d{2}[./-]\d{2}[./-]\d{4}\s+\d{2}:\d{2}:\d{2})"
    ).unwrap();
    static ref RECEIPT_NO: Regex = Regex::new(
        r"(?im)^\s*DEKONT\s*NO\s*/\s*F[İI][ŞS]\s*NO\s*[:=\-]?\s*(\d{3,20}(?:/\d{2,20})?)"
    ).unwrap();
    static ref RECEIPT_NO_LOOSE: Regex =
        Regex::new(r"(?im)^\s*DEKONT\s*NO[^0-9]*(\d{3,20}(?:/\d{2,20})?)").unwrap();
    static ref QUERY_NO: Regex =
        Regex::new(r"(?im)^\s*Sorgu\s*Numaras[ıi]\s*[:=\-]?\s*(\d{6,12})\b").unwrap();
    static ref EIGHT_DIGITS: Regex = Regex::new(r"\b\d{8}\b").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[&["fast", "dekont"]]);

pub struct ZiraatKatilimExtractor;

/// Strip OCR noise around a receiver name; keep it when it has two words
/// or at least six letters and still reads as a name.
fn clean_receiver(value: &str) -> Option<String> {
    let value = LEADING_JUNK.replace(value.trim(), "");
    let end = GLUED_LABEL.find(&value).map(|m| m.start()).unwrap_or(value.len());
    let value = NON_NAME_CHARS.replace_all(&value[..end], " ");
    let value = clean_value(&value)?;
    (value.split_whitespace().count() >= 2 || value.chars().count() >= 6)
        .then_some(value)
        .filter(|v| looks_like_name(v))
}

fn receiver_name(raw: &str) -> Option<String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .find_map(|line| {
            [&*RECEIVER_DAMAGED, &*RECEIVER_PLAIN]
                .iter()
                .filter_map(|re| capture(re, line))
                .find_map(|v| clean_receiver(&v))
        })
}

fn amount(raw: &str) -> Option<String> {
    if let Some(value) = capture(&AMOUNT, raw) {
        return format_amount(&value);
    }
    AMOUNT_BARE
        .find_iter(raw)
        .filter_map(|m| parse_amount(m.as_str()).map(|value| (value, m.as_str())))
        .max_by(|a, b| a.0.cmp(&b.0))
        .and_then(|(_, printed)| format_amount(printed))
}

fn receipt_no(raw: &str) -> Option<String> {
    capture(&RECEIPT_NO, raw).or_else(|| capture(&RECEIPT_NO_LOOSE, raw))
}

/// Labeled query number, else the first eight-digit number after "sorgu".
fn transaction_ref(raw: &str, normalized: &str) -> Option<String> {
    capture(&QUERY_NO, raw).or_else(|| {
        let region = normalized
            .find("sorgu")
            .map(|idx| window(normalized, idx, 220))
            .unwrap_or(normalized);
        EIGHT_DIGITS.find(region).map(|m| m.as_str().to_string())
    })
}

impl Extractor for ZiraatKatilimExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::ZiraatKatilim
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
        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: None,
            receiver_name: receiver_name(raw),
            receiver_iban: ocr_iban(raw),
            amount: amount(raw),
            transaction_time: capture(&TIME, raw)
                .and_then(|v| extract_datetime(&v))
                .or_else(|| extract_datetime(raw)),
            receipt_no: receipt_no(raw),
            transaction_ref: transaction_ref(raw, &text.normalized),
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const OCR_TEXT: &str = r"ZIRAAT KATILIM
GIDEN FAST DEKONTU
Gonderen : M***** Y*****
Alic1 Ach :Ahmet Yaprak
IBAN TR33 OOO6 1005 1978 6457 8413 26
Tutar : 2.450,00 TRY
ISLEM TARIHI : 12/03/2026 15:04:33
DEKONT NO/FIS NO : 88123/45
Sorgu Numarasi : 12345678";

    #[test]
    fn test_damaged_ocr_receipt() {
        let record = ZiraatKatilimExtractor.extract(&ReceiptText::new(OCR_TEXT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name, None);
        assert_eq!(record.receiver_name.as_deref(), Some("Ahmet Yaprak"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("2.450,00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("12.03.2026 15:04:33"));
        assert_eq!(record.receipt_no.as_deref(), Some("88123/45"));
        assert_eq!(record.transaction_ref.as_deref(), Some("12345678"));
    }

    #[test]
    fn test_clean_receiver_cuts_glued_labels() {
        assert_eq!(clean_receiver("1Ahmet Yaprak IBAN TR12").as_deref(), Some("Ahmet Yaprak"));
        assert_eq!(clean_receiver("Ali"), None);
        assert_eq!(clean_receiver("TR12 0001 0012 3456 1.250,00 TL"), None);
    }

    #[test]
    fn test_amount_falls_back_to_largest_figure() {
        assert_eq!(amount("Masraf 5,00\nToplam 1.250,00").as_deref(), Some("1.250,00 TL"));
    }

    #[test]
    fn test_reference_near_query_label() {
        let normalized = "sorgu no bilgisi 20260312 ek";
        assert_eq!(transaction_ref("", normalized).as_deref(), Some("20260312"));
    }
}
