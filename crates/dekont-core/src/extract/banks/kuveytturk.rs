//! Kuveyt Turk receipts in English, Turkish and Arabic.
//!
//! Labels sit on their own line with the value on the next one; a few
//! layouts print `Label: value` instead. Inline values are only taken after a
//! `:` or `-` so that "Gönderen Kişi" never yields "Kişi".

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, capture, capture_all, extract_datetime, extract_iban, format_amount,
    largest_amount, window,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

/// `label` alone on a line, value on the next non-blank line.
fn line_after(labels: &str) -> Regex {
    Regex::new(&format!(r"(?i)(?:^|\n)[ \t]*(?:{labels})[ \t]*\r?\n\s*([^\n]+)")).unwrap()
}

/// `label: value` or `label - value` on one line.
fn inline_strict(labels: &str) -> Regex {
    Regex::new(&format!(r"(?i)(?:^|\n)[ \t]*(?:{labels})[ \t]*[:\-][ \t]*([^\n]+)")).unwrap()
}

const SENDER_EN: &str = "Sender Name";
const RECEIVER_EN: &str = "Recipient Name|Recipient|Beneficiary|Receiver";
const SENDER_TR: &str = "G[öÖo]nderen K[iİıI][şs][iİıI]|G[öÖo]nderen|G[öÖo]nderici";
const RECEIVER_TR: &str = "Al[ıiIİ]c[ıiIİ]";
const SENT_TO_TR: &str = "G[öÖo]nderilen";
const QUERY: &str = "Query Number|Sorgu Numaras[ıi]";
const REFERENCE: &str =
    "TransactionReferance|TransactionReference|Transaction Reference|Transaction Ref|[İI]şlem Referans[ıi]|Islem Referansi";
const DATE_LABEL: &str = r"TransactionDate|Transaction\s*Date|[İI]şlem\s*Tarihi|Islem\s*Tarihi";

lazy_static! {
    static ref SENDER_EN_LINE: Regex = line_after(SENDER_EN);
    static ref SENDER_EN_INLINE: Regex = inline_strict(SENDER_EN);
    static ref RECEIVER_EN_LINE: Regex = line_after(RECEIVER_EN);
    static ref RECEIVER_EN_INLINE: Regex = inline_strict(RECEIVER_EN);
    static ref SENDER_TR_LINE: Regex = line_after(SENDER_TR);
    static ref SENDER_TR_INLINE: Regex = inline_strict(SENDER_TR);
    static ref RECEIVER_TR_LINE: Regex = line_after(RECEIVER_TR);
    static ref RECEIVER_TR_INLINE: Regex = inline_strict(RECEIVER_TR);
    static ref SENT_TO_LINE: Regex = line_after(SENT_TO_TR);
    static ref SENT_TO_INLINE: Regex = inline_strict(SENT_TO_TR);
    static ref QUERY_LINE: Regex = line_after(QUERY);
    static ref QUERY_INLINE: Regex = inline_strict(QUERY);
    static ref REFERENCE_LINE: Regex = line_after(REFERENCE);
    static ref REFERENCE_INLINE: Regex = inline_strict(REFERENCE);

    static ref CUSTOMER_NAME: Regex =
        Regex::new(r"(?i)(?:^|\n)[ \t]*Müşteri Adı\s+([^\n]+)").unwrap();

    static ref DATE_LABEL_RE: Regex = Regex::new(&format!("(?i)(?:{DATE_LABEL})")).unwrap();
    static ref DMY_HM: Regex =
        Regex::new(r"\b(\d{2})[./](\d{2})[./](\d{4})\s+(\d{2}):(\d{2})\b").unwrap();

    static ref LABELED_AMOUNT: Regex = Regex::new(
        r"(?i)(?:^|\n)[ \t]*(?:Amount|Tutar)[ \t]*\r?\n\s*(\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{2})?)\s*(?:TRY|TL)\b"
    ).unwrap();

    static ref LONG_NUMBER: Regex = Regex::new(r"\b(\d{6,})\b").unwrap();
    static ref REF_TOKEN: Regex = Regex::new(r"(?i)\b[A-Z0-9]{3,}(?:-[A-Z0-9]+)*\b").unwrap();
    static ref REF_DASHED: Regex =
        Regex::new(r"(?i)\b[A-Z0-9]{3,}-[A-Z0-9]+-\d{6}\b").unwrap();
    static ref IBAN_PREFIX: Regex = Regex::new(r"(?i)\bTR\s*\d").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[
    &["isleminiz gerceklestirilmistir"],
    &["transaction completed"],
    &["successfully completed"],
]);

/// Receipt language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KuveytTemplate {
    English,
    Turkish,
    /// Arabic receipts reuse the English labels, falling back to Turkish ones.
    Arabic,
}

impl KuveytTemplate {
    fn detect(normalized: &str) -> Self {
        let english = ["transaction details", "sender name", "transactiondate", "amount"]
            .iter()
            .any(|m| normalized.contains(m));
        if english { Self::English } else { Self::Turkish }
    }
}

pub struct KuveytTurkExtractor {
    template: Option<KuveytTemplate>,
}

impl KuveytTurkExtractor {
    pub const fn auto() -> Self {
        Self { template: None }
    }

    pub const fn of(template: KuveytTemplate) -> Self {
        Self { template: Some(template) }
    }
}

fn labeled(raw: &str, line: &Regex, inline: &Regex) -> Option<String> {
    capture(line, raw).or_else(|| capture(inline, raw))
}

fn labeled_name(raw: &str, line: &Regex, inline: &Regex) -> Option<String> {
    labeled(raw, line, inline).and_then(|v| accept_name(&v))
}

fn customer_names(raw: &str) -> Vec<String> {
    capture_all(&CUSTOMER_NAME, raw)
        .iter()
        .filter_map(|v| accept_name(v))
        .collect()
}

fn english_parties(raw: &str) -> (Option<String>, Option<String>) {
    (
        labeled_name(raw, &SENDER_EN_LINE, &SENDER_EN_INLINE),
        labeled_name(raw, &RECEIVER_EN_LINE, &RECEIVER_EN_INLINE),
    )
}

/// With two "Müşteri Adı" blocks the first is the account owner (receiver)
/// and the second the counterparty (sender).
fn turkish_parties(raw: &str) -> (Option<String>, Option<String>) {
    let customers = customer_names(raw);

    let sender = labeled_name(raw, &SENDER_TR_LINE, &SENDER_TR_INLINE)
        .or_else(|| (customers.len() >= 2).then(|| customers[1].clone()));

    let receiver = labeled_name(raw, &RECEIVER_TR_LINE, &RECEIVER_TR_INLINE)
        .or_else(|| {
            labeled_name(raw, &SENT_TO_LINE, &SENT_TO_INLINE).filter(|v| {
                !v.to_lowercase().contains("iban") && !IBAN_PREFIX.is_match(v)
            })
        })
        .or_else(|| customers.first().cloned());

    (sender, receiver)
}

fn amount(raw: &str) -> Option<String> {
    capture(&LABELED_AMOUNT, raw)
        .and_then(|a| format_amount(&a))
        .or_else(|| largest_amount(raw))
}

/// `DD.MM.YYYY HH:MM`, preferring the stamp right after a date label.
fn transaction_time(raw: &str) -> Option<String> {
    let near_label = DATE_LABEL_RE
        .find(raw)
        .and_then(|m| DMY_HM.captures(window(raw, m.end(), 80)));
    let caps = near_label.or_else(|| DMY_HM.captures(raw))?;
    extract_datetime(&format!(
        "{}.{}.{} {}:{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
    ))
}

fn receipt_no(raw: &str) -> Option<String> {
    let value = labeled(raw, &QUERY_LINE, &QUERY_INLINE)?;
    Some(
        LONG_NUMBER
            .captures(&value)
            .map(|caps| caps[1].to_string())
            .unwrap_or(value),
    )
}

fn reference_token(value: &str) -> Option<String> {
    REF_TOKEN
        .find_iter(value)
        .map(|m| m.as_str())
        .find(|token| token.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

fn transaction_ref(raw: &str) -> Option<String> {
    labeled(raw, &REFERENCE_LINE, &REFERENCE_INLINE)
        .and_then(|v| reference_token(&v))
        .or_else(|| REF_DASHED.find(raw).map(|m| m.as_str().to_string()))
}

impl Extractor for KuveytTurkExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::KuveytTurk
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let template = self
            .template
            .unwrap_or_else(|| KuveytTemplate::detect(&text.normalized));

        let (sender_name, receiver_name) = match template {
            KuveytTemplate::English => english_parties(raw),
            KuveytTemplate::Turkish => turkish_parties(raw),
            KuveytTemplate::Arabic => {
                let (en_sender, en_receiver) = english_parties(raw);
                let (tr_sender, tr_receiver) = turkish_parties(raw);
                (en_sender.or(tr_sender), en_receiver.or(tr_receiver))
            }
        };

        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name,
            receiver_name,
            receiver_iban: extract_iban(raw),
            amount: amount(raw),
            transaction_time: transaction_time(raw),
            receipt_no: receipt_no(raw),
            transaction_ref: transaction_ref(raw),
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const ENGLISH_RECEIPT: &str = r"KUVEYT TÜRK KATILIM BANKASI A.Ş.
Transaction Details
Sender Name
JOHN SMITH
Recipient
AYŞE YILMAZ
IBAN
TR33 0006 1005 1978 6457 8413 26
Amount
1,500.00 TRY
Transaction Date
15/07/2026 13:45
Query Number
987654321
Transaction Reference
FT26195KQ2
Transaction completed successfully.";

    const TURKISH_RECEIPT: &str = r"KUVEYT TÜRK
Gönderen Kişi
MUSTAFA ARSLAN
Alıcı
HATİCE ŞAHİN
Alıcı IBAN
TR33 0006 1005 1978 6457 8413 26
Tutar
2.750,00 TL
İşlem Tarihi
20.08.2026 09:30
Sorgu Numarası
112233445
İşlem Referansı: FT26232AB7
İşleminiz gerçekleştirilmiştir.";

    #[test]
    fn test_english_template() {
        let record = KuveytTurkExtractor::auto()
            .extract(&ReceiptText::new(ENGLISH_RECEIPT))
            .unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("JOHN SMITH"));
        assert_eq!(record.receiver_name.as_deref(), Some("AYŞE YILMAZ"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("1,500.00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("15.07.2026 13:45"));
        assert_eq!(record.receipt_no.as_deref(), Some("987654321"));
        assert_eq!(record.transaction_ref.as_deref(), Some("FT26195KQ2"));
    }

    #[test]
    fn test_turkish_template() {
        let record = KuveytTurkExtractor::auto()
            .extract(&ReceiptText::new(TURKISH_RECEIPT))
            .unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("MUSTAFA ARSLAN"));
        assert_eq!(record.receiver_name.as_deref(), Some("HATİCE ŞAHİN"));
        assert_eq!(record.amount.as_deref(), Some("2.750,00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("20.08.2026 09:30"));
        assert_eq!(record.receipt_no.as_deref(), Some("112233445"));
        assert_eq!(record.transaction_ref.as_deref(), Some("FT26232AB7"));
    }

    #[test]
    fn test_customer_name_blocks() {
        let text = "KUVEYT TÜRK\nMüşteri Adı SEVGİ UÇAR\nMüşteri Adı TOLGA EREN\n";
        let record = KuveytTurkExtractor::of(KuveytTemplate::Turkish)
            .extract(&ReceiptText::new(text))
            .unwrap();
        assert_eq!(record.receiver_name.as_deref(), Some("SEVGİ UÇAR"));
        assert_eq!(record.sender_name.as_deref(), Some("TOLGA EREN"));
        assert_eq!(record.tr_status, StatusOutcome::Unknown);
    }

    #[test]
    fn test_arabic_falls_back_to_turkish_labels() {
        let text = format!("إيصال تحويل\n{TURKISH_RECEIPT}");
        let record = KuveytTurkExtractor::of(KuveytTemplate::Arabic)
            .extract(&ReceiptText::new(text))
            .unwrap();
        assert_eq!(record.sender_name.as_deref(), Some("MUSTAFA ARSLAN"));
        assert_eq!(record.receiver_name.as_deref(), Some("HATİCE ŞAHİN"));
    }
}
