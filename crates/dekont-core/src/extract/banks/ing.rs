//! ING receipts.
//!
//! The receiver is not labeled: the description line reads
//! `Giden FAST Sorgu No:... TR.. <bank name> <receiver>`, so the name is
//! whatever follows the IBAN and the bank's legal name.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::patterns::IBAN_SPACED;
use crate::extract::rules::{
    accept_name, capture, extract_datetime, extract_iban, format_amount, largest_amount,
    name_from_capture,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref ACCOUNT_USED: Regex =
        Regex::new(r"(?i)KULLANILAN\s+HESAP\s*:\s*([^\n]+)").unwrap();
    static ref SALUTATION: Regex = Regex::new(r"(?i)Say[ıi]n\s+([^\n]+)").unwrap();
    static ref DESCRIPTION: Regex = Regex::new(r"(?i)A[cç][ıi]klama\s*:\s*([^\n]+)").unwrap();
    static ref LEGAL_SUFFIX: Regex = Regex::new(r"(?i)\bA\.?\s?[SŞ]\.").unwrap();
    static ref BANK_WORDS: Regex =
        Regex::new(r"(?i)\b(?:T[üu]rkiye|Cumhuriyeti|Bankas[ıi])\b").unwrap();

    static ref FAST_AMOUNT: Regex =
        Regex::new(r"(?i)FAST\s+TUTARI\s*:\s*([0-9][0-9,.]*)\s*(?:TL|TRY)\b").unwrap();
    static ref PRINTED_AT: Regex = Regex::new(
        r"(?i)Bas[ıi]m\s+Tarihi\s*:\s*(\d{2})/(\d{2})/(\d{4})\s*-\s*(\d{2}):(\d{2})"
    ).unwrap();
    static ref RECEIPT_NO: Regex = Regex::new(r"(?i)Dekont\s+No\s*:\s*([0-9]+)").unwrap();
    static ref QUERY_NO: Regex = Regex::new(r"(?i)Sorgu\s*No\s*[:\-]?\s*([0-9]{6,})").unwrap();
    static ref SLIP_INFO: Regex = Regex::new(
        r"(?i)Fi[sş]\s+Bilgileri\s*:\s*(\d{2}/\d{2}/\d{4}[-0-9]+)"
    ).unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[
    &["islem", "basarili"],
    &["isleminiz", "gerceklestirilmistir"],
    &["successful"],
    &["completed"],
]);

pub struct IngExtractor;

fn receiver_name(raw: &str) -> Option<String> {
    let description = capture(&DESCRIPTION, raw)?;
    let iban = IBAN_SPACED.find(&description)?;
    let tail = &description[iban.end()..];
    let tail = match LEGAL_SUFFIX.find_iter(tail).last() {
        Some(suffix) => &tail[suffix.end()..],
        None => tail,
    };
    accept_name(&BANK_WORDS.replace_all(tail, " "))
}

fn transaction_time(raw: &str) -> Option<String> {
    let caps = PRINTED_AT.captures(raw)?;
    extract_datetime(&format!(
        "{}.{}.{} {}:{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
    ))
}

impl Extractor for IngExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Ing
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: name_from_capture(&ACCOUNT_USED, raw)
                .or_else(|| name_from_capture(&SALUTATION, raw)),
            receiver_name: receiver_name(raw),
            receiver_iban: extract_iban(raw),
            amount: capture(&FAST_AMOUNT, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: transaction_time(raw),
            receipt_no: capture(&RECEIPT_NO, raw),
            transaction_ref: capture(&QUERY_NO, raw).or_else(|| capture(&SLIP_INFO, raw)),
            ..FieldRecord::default()
        })
    }
}
