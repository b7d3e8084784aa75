//! Vakıf Katılım receipts. No completion wording is printed.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    capture, extract_datetime, iban_in_value, largest_amount, name_from_capture, with_decimals,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};

lazy_static! {
    static ref SENDER: Regex = Regex::new(r"(?i)Gönderen\s*K[İIiı]ş[İIiı]\s*:\s*([^\n]+)").unwrap();
    static ref RECEIVER: Regex =
        Regex::new(r"(?i)Gönderilen\s*K[İIiı]ş[İIiı]\s*:\s*([^\n]+)").unwrap();
    static ref RECEIVER_IBAN: Regex =
        Regex::new(r"(?i)Al[ıi]c[ıi]\s*IBAN\s*:\s*(TR\s*(?:\d\s*){24})").unwrap();
    static ref AMOUNT: Regex =
        Regex::new(r"(?i)Tutar\s+(\d{1,3}(?:\.\d{3})*(?:,\d{2})?)\s*(?:TL|TRY)\b").unwrap();
    static ref TIME: Regex = Regex::new(
        r"(?i)[İI]şlem\s*Tarihi\s*:\s*(\d{2})/(\d{2})/(\d{4})\s+(\d{2}):(\d{2})"
    ).unwrap();
    static ref SERIAL_NO: Regex = Regex::new(r"(?i)Seri-?Sıra\s*No\s*:\s*([A-Z0-9-]+)").unwrap();
    static ref REFERENCE: Regex =
        Regex::new(r"(?i)[İI]şlem\s*Referans\s*No\s*:\s*([A-Z0-9-]+)").unwrap();
}

pub struct VakifKatilimExtractor;

fn transaction_time(raw: &str) -> Option<String> {
    let caps = TIME.captures(raw)?;
    extract_datetime(&format!(
        "{}.{}.{} {}:{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
    ))
}

impl Extractor for VakifKatilimExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::VakifKatilim
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: name_from_capture(&SENDER, raw),
            receiver_name: name_from_capture(&RECEIVER, raw),
            receiver_iban: capture(&RECEIVER_IBAN, raw).and_then(|v| iban_in_value(&v)),
            amount: capture(&AMOUNT, raw)
                .map(|v| format!("{} TL", with_decimals(&v)))
                .or_else(|| largest_amount(raw)),
            transaction_time: transaction_time(raw),
            receipt_no: capture(&SERIAL_NO, raw),
            transaction_ref: capture(&REFERENCE, raw),
            ..FieldRecord::default()
        })
    }
}
