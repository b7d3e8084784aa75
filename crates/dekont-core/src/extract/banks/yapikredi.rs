//! Yapi Kredi receipts: FAST transfer and Havale layouts.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    accept_name, capture, extract_datetime, format_amount, iban_in_value, largest_amount,
    name_from_capture, non_blank_lines,
};
use crate::extract::{Extractor, ReceiptText, Result, TransferKind};
use crate::models::{FieldRecord, Issuer};
use crate::normalize::normalize;
use crate::status::StatusVocabulary;

lazy_static! {
    static ref TIME: Regex = Regex::new(
        r"(?i)[İIiı]ŞLEM\s+TAR[İIiı]H[İIiı]\s*:\s*(\d{2}\.\d{2}\.\d{4}\s+\d{2}:\d{2}:\d{2})"
    ).unwrap();
    static ref REF: Regex = Regex::new(r"(?i)[İIiı]ŞLEM\s+REF\s*:\s*([0-9]+)").unwrap();

    static ref SENDER: Regex = Regex::new(r"(?i)GÖNDEREN\s+ADI\s*:\s*([^\n]+)").unwrap();
    static ref PAYMENT_SOURCE: Regex =
        Regex::new(r"(?i)ÖDEMEN[İIiı]N\s+KAYNA[ĞG]I\s*:.*$").unwrap();
    static ref RECEIVER: Regex = Regex::new(r"(?i)ALICI\s+ADI\s*:\s*([^\n]+)").unwrap();
    static ref RECEIVER_ACCOUNT: Regex =
        Regex::new(r"(?i)ALICI\s+HESAP\s*:\s*(TR[0-9 ]{10,})").unwrap();
    static ref FAST_AMOUNT: Regex =
        Regex::new(r"(?i)G[İIiı]DEN\s+FAST\s+TUTARI\s*:\s*[-\s]*([0-9][0-9.,]*)").unwrap();
    static ref SEQUENCE: Regex =
        Regex::new(r"(?i)SIRA\s+NO/ID\s*:\s*([0-9\- ]+\s*/\s*[0-9]+)").unwrap();

    static ref CREDITOR: Regex = Regex::new(r"(?i)ALACAKLI\s+ADI\s*:\s*([^\n]+)").unwrap();
    static ref CREDITOR_ACCOUNT: Regex = Regex::new(
        r"(?i)ALACAKLI\s+HESAP\s*:\s*(?:[0-9]+/IBAN:)?\s*(TR[0-9 ]{10,})"
    ).unwrap();
    static ref HAVALE_AMOUNT: Regex =
        Regex::new(r"(?i)[İIiı]SLEM\s+TUTARI\s*:\s*[-\s]*([0-9][0-9.,]*)").unwrap();
    static ref DOCUMENT_NO: Regex =
        Regex::new(r"(?i)BELGE\s+NUMARASI\s*:\s*([A-Z0-9]+)").unwrap();

    static ref HAVALE_MARKERS: Regex =
        Regex::new(r"havale\s?-\s?borc|dekont tipi\s?:\s?hvl|alacakli hesap").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[
    &["tamamlanmistir"],
    &["isleminiz an itibariyle"],
    &["hesabiniza borc/alacak kaydedilmistir"],
    &["hesabiniza borc kaydedilmistir"],
    &["hesabiniza alacak kaydedilmistir"],
]);

/// Lines after "AÇIKLAMA:" that are footer boilerplate, never the sender.
const FOOTER_PREFIXES: &[&str] = &[
    "e-dekont",
    "ticari unvan",
    "buyuk mukellefler",
    "web adresi",
    "ticaret sicil",
    "plaza",
    "mersis no",
    "mobil",
    "sistem",
];

/// Yapi Kredi extractor, fixed to one layout or detecting it per receipt.
pub struct YapiKrediExtractor {
    kind: Option<TransferKind>,
}

impl YapiKrediExtractor {
    /// Detect FAST or Havale from the receipt.
    pub const fn auto() -> Self {
        Self { kind: None }
    }

    pub const fn of(kind: TransferKind) -> Self {
        Self { kind: Some(kind) }
    }

    fn detect(normalized: &str) -> TransferKind {
        if normalized.contains("fast gonderimi") {
            TransferKind::Fast
        } else if HAVALE_MARKERS.is_match(normalized) {
            TransferKind::Havale
        } else {
            TransferKind::Fast
        }
    }

    fn fast(raw: &str, record: &mut FieldRecord) {
        record.sender_name = capture(&SENDER, raw)
            .map(|v| PAYMENT_SOURCE.replace(&v, "").trim_end_matches([' ', '/']).to_string())
            .and_then(|v| accept_name(&v));
        record.receiver_name = name_from_capture(&RECEIVER, raw);
        record.receiver_iban = capture(&RECEIVER_ACCOUNT, raw).and_then(|v| iban_in_value(&v));
        record.amount = capture(&FAST_AMOUNT, raw).and_then(|a| format_amount(&a));
        record.receipt_no = capture(&SEQUENCE, raw);
    }

    fn havale(raw: &str, record: &mut FieldRecord) {
        record.sender_name = sender_after_description(raw);
        record.receiver_name = name_from_capture(&CREDITOR, raw);
        record.receiver_iban = capture(&CREDITOR_ACCOUNT, raw).and_then(|v| iban_in_value(&v));
        record.amount = capture(&HAVALE_AMOUNT, raw).and_then(|a| format_amount(&a));
        record.receipt_no = capture(&DOCUMENT_NO, raw);
    }
}

/// Havale receipts print the sender as an unlabeled line after "AÇIKLAMA:".
fn sender_after_description(raw: &str) -> Option<String> {
    let lines = non_blank_lines(raw);
    let start = lines
        .iter()
        .position(|l| normalize(l).starts_with("aciklama:"))?;

    lines.iter().skip(start + 1).take(7).find_map(|line| {
        let n = normalize(line);
        if FOOTER_PREFIXES.iter().any(|p| n.starts_with(p))
            || n.contains("havale ucreti")
            || n.contains("giden havale")
            || n.contains("iban")
        {
            return None;
        }
        accept_name(line)
    })
}

impl Extractor for YapiKrediExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::YapiKredi
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let mut record = FieldRecord {
            tr_status: self.status(text),
            transaction_time: capture(&TIME, raw).and_then(|t| extract_datetime(&t)),
            transaction_ref: capture(&REF, raw),
            ..FieldRecord::default()
        };

        match self.kind.unwrap_or_else(|| Self::detect(&text.normalized)) {
            TransferKind::Fast => Self::fast(raw, &mut record),
            TransferKind::Havale => Self::havale(raw, &mut record),
        }

        record.amount = record.amount.or_else(|| largest_amount(raw));
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const FAST_RECEIPT: &str = r"YAPI VE KREDİ BANKASI A.Ş.
FAST GÖNDERİMİ
İŞLEM TARİHİ : 21.03.2026 16:40:12
GÖNDEREN ADI : CAN ÖZKAN ÖDEMENİN KAYNAĞI : MAAŞ /
ALICI ADI : SELİN AKIN
ALICI HESAP : TR33 0006 1005 1978 6457 8413 26
GİDEN FAST TUTARI : -1.200,00
SIRA NO/ID : 2026-0321 / 88412
İŞLEM REF : 778899
İşleminiz an itibariyle tamamlanmıştır.
www.yapikredi.com.tr";

    const HAVALE_RECEIPT: &str = r"www.yapikredi.com.tr
DEKONT TİPİ : HVL
İŞLEM TARİHİ : 02.04.2026 11:05:00
ALACAKLI ADI : BURAK ŞEN
ALACAKLI HESAP : 12345678/IBAN: TR33 0006 1005 1978 6457 8413 26
ISLEM TUTARI : 3.000,00
BELGE NUMARASI : MOA123456
AÇIKLAMA: KİRA
Web adresi: www.yapikredi.com.tr
ALİ IŞIKSOY";

    #[test]
    fn test_fast_layout() {
        let record = YapiKrediExtractor::auto()
            .extract(&ReceiptText::new(FAST_RECEIPT))
            .unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("CAN ÖZKAN"));
        assert_eq!(record.receiver_name.as_deref(), Some("SELİN AKIN"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("1.200,00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("21.03.2026 16:40:12"));
        assert_eq!(record.receipt_no.as_deref(), Some("2026-0321 / 88412"));
        assert_eq!(record.transaction_ref.as_deref(), Some("778899"));
    }

    #[test]
    fn test_havale_layout() {
        let record = YapiKrediExtractor::auto()
            .extract(&ReceiptText::new(HAVALE_RECEIPT))
            .unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Unknown);
        assert_eq!(record.sender_name.as_deref(), Some("ALİ IŞIKSOY"));
        assert_eq!(record.receiver_name.as_deref(), Some("BURAK ŞEN"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("3.000,00 TL"));
        assert_eq!(record.receipt_no.as_deref(), Some("MOA123456"));
    }

    #[test]
    fn test_fixed_layout_ignores_markers() {
        let record = YapiKrediExtractor::of(TransferKind::Fast)
            .extract(&ReceiptText::new(HAVALE_RECEIPT))
            .unwrap();
        assert_eq!(record.receiver_name, None);
        assert_eq!(record.receipt_no, None);
    }
}
