//! Enpara receipts. Besides the canonical fields these carry a sequence
//! number ("Sıra No") and a slip number ("Fiş No"), reported as extras.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, capture, extract_date, extract_datetime, format_amount, iban_in_value,
    largest_amount,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref SALUTATION: Regex = Regex::new(r"(?i)Say[ıi]n\s+([^\n]+)").unwrap();
    static ref CUSTOMER: Regex =
        Regex::new(r"(?i)MÜŞTER[İI]\s+ÜNVANI\s*:\s*([^:\n]+?)\s+IBAN").unwrap();
    static ref CUSTOMER_IBAN: Regex = Regex::new(
        r"(?i)MÜŞTER[İI]\s+ÜNVANI\s*:[^\n]*?\s+IBAN\s*:\s*(TR[0-9 ]{24,})"
    ).unwrap();
    static ref CURRENT_ACCOUNT_IBAN: Regex =
        Regex::new(r"(?i)Vadesiz\s+TL\s+[^\n]*?\s+(TR[0-9]{24,})").unwrap();

    static ref RECEIVER: Regex =
        Regex::new(r"(?i)ALICI\s+ÜNVANI\s*:\s*([^\n]+?)\s+ALICI\s+IBAN").unwrap();
    static ref RECEIVER_IBAN: Regex =
        Regex::new(r"(?i)ALICI\s+IBAN\s*:\s*(TR[0-9 ]{24,})").unwrap();

    static ref EFT_AMOUNT: Regex =
        Regex::new(r"(?i)EFT\s+TUTARI\s*:\s*([0-9.,]+)\s*TL").unwrap();
    // Table footer "... B TL 50,000.00".
    static ref TABLE_AMOUNT: Regex = Regex::new(r"(?im)\bTL\s+([0-9.,]+)[ \t]*$").unwrap();

    static ref QUERY_NO: Regex = Regex::new(r"(?i)SORGU\s+NO\s*:\s*([0-9]+)").unwrap();
    static ref SLIP_NO: Regex = Regex::new(r"(?i)Fiş\s+No\s+([0-9]+)").unwrap();
    static ref SEQUENCE_NO: Regex =
        Regex::new(r"(?i)S[ıi]ra\s+No\s+(\d{4,}(?:-\d{2,})+)").unwrap();

    static ref STAMP: Regex = Regex::new(
        r"(?i)[İI]şlem\s+tarihi\s+ve\s+saati\s+(\d{2}\.\d{2}\.\d{4})(?:\s+(\d{2}:\d{2}))?"
    ).unwrap();
    static ref ANY_TIME: Regex = Regex::new(r"\b(\d{2}:\d{2})\b").unwrap();
}

// The receipt title is the only completion evidence these layouts carry:
// a page titled "Dekont" is issued for completed transfers only.
const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[&["dekont"]]);

pub struct EnparaExtractor;

fn sender_name(raw: &str) -> Option<String> {
    // The salutation line can run into a starred address block.
    capture(&SALUTATION, raw)
        .and_then(|line| accept_name(line.split('*').next().unwrap_or_default()))
        .or_else(|| capture(&CUSTOMER, raw).and_then(|v| accept_name(&v)))
}

/// Date from the stamp label; the time may sit elsewhere on the page.
fn transaction_time(raw: &str) -> Option<String> {
    let caps = STAMP.captures(raw)?;
    let date = &caps[1];
    let time = caps
        .get(2)
        .map(|m| m.as_str())
        .or_else(|| ANY_TIME.captures(raw).and_then(|t| t.get(1)).map(|m| m.as_str()));
    match time {
        Some(time) => extract_datetime(&format!("{date} {time}")),
        None => extract_date(date),
    }
}

impl Extractor for EnparaExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Enpara
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let slip_no = capture(&SLIP_NO, raw);

        let record = FieldRecord {
            tr_status: self.status(text),
            sender_name: sender_name(raw),
            sender_iban: capture(&CUSTOMER_IBAN, raw)
                .or_else(|| capture(&CURRENT_ACCOUNT_IBAN, raw))
                .and_then(|v| iban_in_value(&v)),
            receiver_name: capture(&RECEIVER, raw).and_then(|v| accept_name(&v)),
            receiver_iban: capture(&RECEIVER_IBAN, raw).and_then(|v| iban_in_value(&v)),
            amount: capture(&EFT_AMOUNT, raw)
                .or_else(|| capture(&TABLE_AMOUNT, raw))
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: transaction_time(raw),
            receipt_no: slip_no.clone(),
            transaction_ref: capture(&QUERY_NO, raw),
            ..FieldRecord::default()
        };

        Ok(record
            .with_extra(FieldRecord::SIRA_NO, capture(&SEQUENCE_NO, raw))
            .with_extra(FieldRecord::FIS_NO, slip_no))
    }
}
