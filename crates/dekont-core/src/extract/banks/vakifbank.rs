//! VakıfBank receipts.
//!
//! The text layer of these receipts splits capitalized words at random
//! ("İŞL EM", "S ORGU NO", "AL ICI"). Numeric fields are read from a
//! matching form where runs of capitals separated by spaces are joined back;
//! names and the IBAN are read from the raw text with split-tolerant labels.
//! The receipts carry no completion wording.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, capture, clean_value, extract_datetime, extract_iban, largest_amount,
    with_decimals,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::normalize::{collapse_whitespace, fold_upper};

lazy_static! {
    static ref SENDER: Regex = Regex::new(
        r"(?is)G[ÖO]NDEREN\s*AD\s*S\s*OYAD\s*/\s*UNVAN\s*(.*?)\s+AL\s*ICI\s+AD\s*S\s*OYAD\s*/?\s*UNVAN"
    ).unwrap();
    static ref RECEIVER: Regex = Regex::new(
        r"(?is)AL\s*ICI\s+AD\s*S\s*OYAD\s*/?\s*UNVAN\s*(.*?)\s+AL\s*ICI\s+HES\s*AP\s+NO\s*/\s*IBAN"
    ).unwrap();
    static ref RECEIVER_ACCOUNT: Regex = Regex::new(
        r"(?is)AL\s*ICI\s+HES\s*AP\s+NO\s*/\s*IBAN(.*?)(?:[İI][ŞS]L\s*EM\s*NO|F[İI][ŞS]\s*NO|[İI][ŞS]L\s*EM\s*A[ÇC]IKL|[İI]NTERNET\s+S|$)"
    ).unwrap();
    static ref SPLIT_INITIAL: Regex =
        Regex::new(r"\b([A-ZÇĞİÖŞÜ])\s+([A-ZÇĞİÖŞÜ]{2,})\b").unwrap();

    // Matched against the joined upper-case form.
    static ref TIME: Regex =
        Regex::new(r"ISLEMTARIHI\s+(\d{2}\.\d{2}\.\d{4})\s+(\d{2}):(\d{2})").unwrap();
    static ref QUERY_NO: Regex = Regex::new(r"SORGUNO\s+(\d{6,})").unwrap();
    static ref OPERATION_NO: Regex = Regex::new(r"ISLEMNO\s+(\d{8,})").unwrap();
    static ref AMOUNT: Regex =
        Regex::new(r"ISLEMTUTARI\s+(\d{1,3}(?:\.\d{3})*(?:,\d{2})?)\s*(?:TL|TRY)").unwrap();
}

pub struct VakifBankExtractor;

/// Upper-case ASCII-folded text with the whitespace between two capitals removed.
fn match_text(raw: &str) -> String {
    let folded: Vec<char> = fold_upper(raw).chars().collect();
    let mut out = String::with_capacity(folded.len());
    let mut i = 0;

    while i < folded.len() {
        if !folded[i].is_whitespace() {
            out.push(folded[i]);
            i += 1;
            continue;
        }
        let start = i;
        while i < folded.len() && folded[i].is_whitespace() {
            i += 1;
        }
        let after_capital = out.chars().last().is_some_and(|c| c.is_ascii_uppercase());
        let before_capital = folded.get(i).is_some_and(|c| c.is_ascii_uppercase());
        if !(after_capital && before_capital) {
            out.extend(&folded[start..i]);
        }
    }

    collapse_whitespace(&out)
}

/// Glue a stray leading capital back onto the rest of its word ("K EMAL").
fn fix_name_splits(name: &str) -> Option<String> {
    let mut value = collapse_whitespace(name);
    for _ in 0..10 {
        let joined = SPLIT_INITIAL.replace_all(&value, "$1$2").into_owned();
        if joined == value {
            break;
        }
        value = joined;
    }
    clean_value(&value)
}

fn party_name(label: &Regex, raw: &str) -> Option<String> {
    capture(label, raw)
        .and_then(|v| fix_name_splits(&v))
        .and_then(|v| accept_name(&v))
}

fn transaction_time(matching: &str) -> Option<String> {
    let caps = TIME.captures(matching)?;
    extract_datetime(&format!("{} {}:{}", &caps[1], &caps[2], &caps[3]))
}

impl Extractor for VakifBankExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::VakifBank
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let matching = match_text(raw);

        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: party_name(&SENDER, raw),
            receiver_name: party_name(&RECEIVER, raw),
            receiver_iban: RECEIVER_ACCOUNT
                .captures(raw)
                .and_then(|caps| caps.get(1))
                .and_then(|block| extract_iban(block.as_str())),
            amount: capture(&AMOUNT, &matching)
                .map(|v| format!("{} TL", with_decimals(&v)))
                .or_else(|| largest_amount(raw)),
            transaction_time: transaction_time(&matching),
            receipt_no: capture(&QUERY_NO, &matching),
            transaction_ref: capture(&OPERATION_NO, &matching),
            ..FieldRecord::default()
        })
    }
}
