//! Ziraat Bankasi receipts: FAST, account-to-account Havale and a generic
//! layout that only reliably carries the parties.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    capture, extract_datetime, extract_iban, format_amount, iban_in_value, largest_amount,
    name_from_capture, window,
};
use crate::extract::{Extractor, ReceiptText, Result, TransferKind};
use crate::models::{FieldRecord, Issuer};
use crate::normalize::{collapse_whitespace, strip_invisible};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref SAYIN: Regex = Regex::new(r"(?i)SAYIN\s*\n\s*([^\n]+)").unwrap();
    static ref SENDER: Regex = Regex::new(r"(?i)G[öÖo]nderen\s*:\s*([^\n]+)").unwrap();
    static ref RECEIVER: Regex = Regex::new(r"(?i)Al[ıi]c[ıi]\s*:\s*([^\n]+)").unwrap();
    static ref RECEIVER_ACCOUNT: Regex =
        Regex::new(r"(?i)Al[ıi]c[ıi]\s*Hesap\s*:\s*([^\n]+)").unwrap();
    static ref FAST_AMOUNT: Regex =
        Regex::new(r"(?i)[İIiı]şlem\s*Tutar[ıi]\s*:\s*([0-9.,]+)\s*(?:TRY|TL)\b").unwrap();

    static ref CREDITOR_NAME: Regex =
        Regex::new(r"(?i)Alacakl[ıi]\s*Ad[ıi]\s*Soyad[ıi]\s*:\s*([^\n]+)").unwrap();
    static ref CREDITOR_IBAN: Regex =
        Regex::new(r"(?i)Alacakl[ıi]\s*IBAN\s*:\s*([^\n]+)").unwrap();
    static ref HAVALE_AMOUNT: Regex =
        Regex::new(r"(?i)Havale\s*Tutar[ıi]\s*:\s*([0-9.,]+)\s*(?:TRY|TL)\b").unwrap();
    static ref HAVALE_CODE: Regex = Regex::new(
        r"(?i)[İIiı]ŞLEM\s*TAR[İIiı]H[İIiı]\s*:\s*\d{2}/\d{2}/\d{4}.{0,10}\d{2}:\d{2}:\d{2}\s*-\s*([A-Z0-9]+)"
    ).unwrap();

    // Stamp printed as "dd/mm/yyyy - hh:mm:ss" with arbitrary filler between.
    static ref STAMP: Regex = Regex::new(
        r"\b(\d{2})/(\d{2})/(\d{4})\b.{0,20}?\b(\d{2}):(\d{2}):(\d{2})\b"
    ).unwrap();

    // Letters of "FAST SORGU NO" may come out of the text layer split apart.
    static ref FAST_QUERY: Regex = Regex::new(
        r"f\s*a\s*s\s*t[\s\S]{0,120}?s\s*o\s*r\s*g\s*u[\s\S]{0,80}?n\s*o"
    ).unwrap();
    static ref QUERY: Regex = Regex::new(r"s\s*o\s*r\s*g\s*u[\s\S]{0,200}?n\s*o").unwrap();
    static ref LONG_NUMBER: Regex = Regex::new(r"\b(\d{6,})\b").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[
    &["islemi gerceklestirilmistir"],
    &["isleminiz gerceklestirilmistir"],
]);

/// Extractor for all Ziraat layouts; the layout is read from the receipt.
pub struct ZiraatExtractor;

impl ZiraatExtractor {
    fn kind(normalized: &str) -> Option<TransferKind> {
        let fast = ["hesaptan fast", "fast mesaj kodu", "fast sorgu no"]
            .iter()
            .any(|m| normalized.contains(m))
            || (normalized.contains("fast") && normalized.contains("sorgu"));
        if fast {
            Some(TransferKind::Fast)
        } else if normalized.contains("hesaptan hesaba havale") {
            Some(TransferKind::Havale)
        } else {
            None
        }
    }
}

fn transaction_time(raw: &str) -> Option<String> {
    let flat = collapse_whitespace(&strip_invisible(raw));
    let caps = STAMP.captures(&flat)?;
    extract_datetime(&format!(
        "{}.{}.{} {}:{}:{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6]
    ))
}

fn fast_query_no(raw: &str) -> Option<String> {
    let flat = collapse_whitespace(&strip_invisible(raw)).to_lowercase();

    let number_from = |start: usize| {
        LONG_NUMBER
            .captures(window(&flat, start, 250))
            .map(|caps| caps[1].to_string())
    };

    FAST_QUERY
        .find(&flat)
        .and_then(|m| number_from(m.start()))
        .or_else(|| QUERY.find(&flat).and_then(|m| number_from(m.start())))
        .or_else(|| {
            flat.find("sorgu").and_then(|idx| {
                LONG_NUMBER
                    .captures(window(&flat, idx, 300))
                    .map(|caps| caps[1].to_string())
            })
        })
}

impl Extractor for ZiraatExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::Ziraat
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let mut record = FieldRecord {
            tr_status: self.status(text),
            transaction_time: transaction_time(raw),
            ..FieldRecord::default()
        };

        match Self::kind(&text.normalized) {
            Some(TransferKind::Fast) => {
                record.sender_name = name_from_capture(&SENDER, raw)
                    .or_else(|| name_from_capture(&SAYIN, raw));
                record.receiver_name = name_from_capture(&RECEIVER, raw);
                record.receiver_iban =
                    capture(&RECEIVER_ACCOUNT, raw).and_then(|line| iban_in_value(&line));
                record.amount = capture(&FAST_AMOUNT, raw).and_then(|a| format_amount(&a));
                record.receipt_no = fast_query_no(raw);
            }
            Some(TransferKind::Havale) => {
                record.sender_name = name_from_capture(&SAYIN, raw);
                record.receiver_name = name_from_capture(&CREDITOR_NAME, raw);
                record.receiver_iban =
                    capture(&CREDITOR_IBAN, raw).and_then(|line| iban_in_value(&line));
                record.amount = capture(&HAVALE_AMOUNT, raw).and_then(|a| format_amount(&a));
                record.receipt_no = capture(&HAVALE_CODE, raw);
            }
            None => {
                record.sender_name = name_from_capture(&SAYIN, raw);
                record.receiver_name = name_from_capture(&RECEIVER, raw);
                record.receiver_iban = extract_iban(raw);
            }
        }

        record.amount = record.amount.or_else(|| largest_amount(raw));
        Ok(record)
    }
}
