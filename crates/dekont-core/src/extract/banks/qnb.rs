//! QNB receipts.
//!
//! Havale receipts name the parties with "HAVALEYİ GÖNDEREN/ALAN" labels,
//! outgoing FAST EFT receipts with "GÖNDEREN" and "ALICI ÜNVANI". When a
//! Havale receipt yields no receiver the FAST labels are tried as well.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, capture, extract_datetime, format_amount, iban_in_value, largest_amount,
};
use crate::extract::{Extractor, ReceiptText, Result, TransferKind};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref QUERY_NO: Regex = Regex::new(r"(?i)SORGU\s*NO\s*:\s*([0-9]{6,})").unwrap();
    // The text layer sometimes prints the number before its label.
    static ref SEQUENCE_BEFORE: Regex = Regex::new(
        r"(?i)\b(\d{5})\s*[-‐–—]\s*(\d{5,6})\s*S[ıiİI]ra\s*No\b"
    ).unwrap();
    static ref SEQUENCE_AFTER: Regex = Regex::new(
        r"(?i)S[ıiİI]ra\s*No\s*[:\-]?\s*(\d{5})\s*[-‐–—]\s*(\d{5,6})\b"
    ).unwrap();
    static ref SLIP_NO: Regex = Regex::new(r"(?i)Fiş\s*No\s*:\s*([0-9]+)").unwrap();

    static ref DATE: Regex = Regex::new(r"\b(\d{2})/(\d{2})/(\d{4})\b").unwrap();
    static ref TIME: Regex = Regex::new(r"\b(\d{2}):(\d{2})(?::\d{2})?\b").unwrap();

    static ref EFT_AMOUNT: Regex =
        Regex::new(r"(?i)EFT\s+TUTARI\s*:\s*([0-9.,]+)\s*TL").unwrap();
    static ref TL_FIRST: Regex = Regex::new(r"(?i)\bTL\s+([0-9.,]+)").unwrap();

    static ref HAVALE_SENDER: Regex = Regex::new(
        r"(?i)HAVALEY[İI]\s+G[ÖO]NDEREN\s+HESAP\s+UNVANI\s*:\s*([^\n]+)"
    ).unwrap();
    static ref HAVALE_RECEIVER: Regex = Regex::new(
        r"(?i)HAVALEY[İI]\s+ALAN\s+MUSTERI\s+UNVANI\s*:\s*([^\n]+)"
    ).unwrap();
    static ref HAVALE_IBAN: Regex = Regex::new(r"(?i)IBAN\s*:\s*(TR(?:\s*\d){24})").unwrap();

    static ref FAST_RECEIVER: Regex =
        Regex::new(r"(?i)ALICI\s+ÜNVANI\s*:\s*([^\n]+?)\s+ALICI\s+IBAN").unwrap();
    static ref FAST_IBAN: Regex =
        Regex::new(r"(?i)ALICI\s+IBAN\s*:\s*(TR(?:\s*\d){24})").unwrap();
    static ref FAST_SENDER: Regex = Regex::new(r"(?i)GÖNDEREN\s*:\s*([^\n]+)").unwrap();
    static ref DESCRIPTION: Regex = Regex::new(r"(?i)\bAÇIKLAMA\b").unwrap();
    static ref CUSTOMER: Regex =
        Regex::new(r"(?i)MÜŞTER[İI]\s+ÜNVANI\s*:\s*([^\n]+?)\s+IBAN").unwrap();

    static ref HAVALE_LAYOUT: Regex = Regex::new(r"(?i)HESAPTAN\s+HESABA\s+HAVALE").unwrap();
    static ref FAST_LAYOUT: Regex = Regex::new(r"(?i)G[İI]DEN\s+FAST\s+EFT").unwrap();
}

// Havale receipts state completion; FAST receipts only carry the "Dekont"
// title, which is issued for completed transfers only.
const VOCABULARY: StatusVocabulary =
    StatusVocabulary::new(&[&["hareketler gerceklestirilmis"], &["dekont"]]);

/// QNB extractor, fixed to one layout or reading it from the receipt.
pub struct QnbExtractor {
    kind: Option<TransferKind>,
}

impl QnbExtractor {
    pub const fn auto() -> Self {
        Self { kind: None }
    }

    pub const fn of(kind: TransferKind) -> Self {
        Self { kind: Some(kind) }
    }
}

fn receipt_no(raw: &str) -> Option<String> {
    if let Some(query) = capture(&QUERY_NO, raw) {
        return Some(query);
    }
    SEQUENCE_BEFORE
        .captures(raw)
        .or_else(|| SEQUENCE_AFTER.captures(raw))
        .map(|caps| format!("{}-{}", &caps[1], &caps[2]))
}

/// Date and time are separate cells; seconds are not reported.
fn transaction_time(raw: &str) -> Option<String> {
    let date = DATE.captures(raw)?;
    let time = TIME.captures(raw)?;
    extract_datetime(&format!(
        "{}.{}.{} {}:{}",
        &date[1], &date[2], &date[3], &time[1], &time[2]
    ))
}

fn amount(raw: &str) -> Option<String> {
    capture(&EFT_AMOUNT, raw)
        .or_else(|| capture(&TL_FIRST, raw))
        .and_then(|a| format_amount(&a))
        .or_else(|| largest_amount(raw))
}

fn fast_sender(raw: &str) -> Option<String> {
    if let Some(line) = capture(&FAST_SENDER, raw) {
        let end = DESCRIPTION.find(&line).map(|m| m.start()).unwrap_or(line.len());
        return accept_name(&line[..end]);
    }
    capture(&CUSTOMER, raw).and_then(|v| accept_name(&v))
}

impl Extractor for QnbExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Qnb
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let (havale, fast) = match self.kind {
            Some(TransferKind::Havale) => (true, false),
            Some(TransferKind::Fast) => (false, true),
            None => (HAVALE_LAYOUT.is_match(raw), FAST_LAYOUT.is_match(raw)),
        };

        let mut record = FieldRecord {
            tr_status: self.status(text),
            amount: amount(raw),
            transaction_time: transaction_time(raw),
            receipt_no: receipt_no(raw),
            transaction_ref: capture(&SLIP_NO, raw),
            ..FieldRecord::default()
        };

        if havale {
            record.sender_name = capture(&HAVALE_SENDER, raw).and_then(|v| accept_name(&v));
            record.receiver_name = capture(&HAVALE_RECEIVER, raw).and_then(|v| accept_name(&v));
            record.receiver_iban = capture(&HAVALE_IBAN, raw).and_then(|v| iban_in_value(&v));
        }

        if fast || (record.receiver_name.is_none() && record.receiver_iban.is_none()) {
            record.sender_name = record.sender_name.or_else(|| fast_sender(raw));
            record.receiver_name = record
                .receiver_name
                .or_else(|| capture(&FAST_RECEIVER, raw).and_then(|v| accept_name(&v)));
            record.receiver_iban = record
                .receiver_iban
                .or_else(|| capture(&FAST_IBAN, raw).and_then(|v| iban_in_value(&v)));
        }

        Ok(record)
    }
}
