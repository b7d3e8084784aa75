//! Türkiye Finans receipts.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::rules::{
    capture, extract_datetime, extract_iban, format_amount, largest_amount, name_from_capture,
};
use crate::extract::{Extractor, ReceiptText, Result};
use crate::models::{FieldRecord, Issuer};
use crate::status::StatusVocabulary;

lazy_static! {
    static ref SENDER: Regex = Regex::new(r"(?i)GÖNDEREN\s*[İI]sim\s*:\s*([^\n]+)").unwrap();
    static ref RECEIVER: Regex = Regex::new(r"(?i)ALICI\s*[İI]sim\s*:\s*([^\n]+)").unwrap();
    static ref AMOUNT: Regex = Regex::new(r"(?i)Tutar\s*:\s*([\d.,]+)").unwrap();
    static ref ISSUED_AT: Regex =
        Regex::new(r"(?i)Düzenleme Tarihi\s*:\s*([0-9./]+\s+[0-9:]+)").unwrap();
    static ref REFERENCE: Regex = Regex::new(r"(?i)Referans No\s*:\s*([A-Z0-9\-]+)").unwrap();
}

const VOCABULARY: StatusVocabulary = StatusVocabulary::new(&[
    &["isleminiz gerceklestirilmistir"],
    &["basariyla gerceklesti"],
    &["basarili"],
    &["tamamlandi"],
]);

pub struct TurkiyeFinansExtractor;

impl Extractor for TurkiyeFinansExtractor {
    fn issuer(&self) -> Issuer {
        Issuer::TurkiyeFinans
    }

    fn status_vocabulary(&self) -> StatusVocabulary {
        VOCABULARY
    }

    fn extract(&self, text: &ReceiptText<'_>) -> Result<FieldRecord> {
        let raw = text.raw.as_ref();
        let reference = capture(&REFERENCE, raw);

        Ok(FieldRecord {
            tr_status: self.status(text),
            sender_name: name_from_capture(&SENDER, raw),
            receiver_name: name_from_capture(&RECEIVER, raw),
            receiver_iban: extract_iban(raw),
            amount: capture(&AMOUNT, raw)
                .and_then(|a| format_amount(&a))
                .or_else(|| largest_amount(raw)),
            transaction_time: capture(&ISSUED_AT, raw).and_then(|t| extract_datetime(&t)),
            receipt_no: reference.clone(),
            transaction_ref: reference,
            ..FieldRecord::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusOutcome;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = r"TÜRKİYE FİNANS KATILIM BANKASI A.Ş.
GÖNDEREN İsim : YUSUF KAPLAN
ALICI İsim : ESRA DOĞAN
ALICI IBAN : TR33 0006 1005 1978 6457 8413 26
Tutar : 860,00
Düzenleme Tarihi : 18.06.2026 10:12:40
Referans No : TF-20260618-77
İşlem başarıyla gerçekleşti.";

    #[test]
    fn test_receipt() {
        let record = TurkiyeFinansExtractor.extract(&ReceiptText::new(RECEIPT)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Completed);
        assert_eq!(record.sender_name.as_deref(), Some("YUSUF KAPLAN"));
        assert_eq!(record.receiver_name.as_deref(), Some("ESRA DOĞAN"));
        assert_eq!(record.receiver_iban.as_deref(), Some("TR330006100519786457841326"));
        assert_eq!(record.amount.as_deref(), Some("860,00 TL"));
        assert_eq!(record.transaction_time.as_deref(), Some("18.06.2026 10:12:40"));
        assert_eq!(record.receipt_no.as_deref(), Some("TF-20260618-77"));
        assert_eq!(record.transaction_ref.as_deref(), Some("TF-20260618-77"));
    }

    #[test]
    fn test_failure_wins_over_completion_wording() {
        let text = RECEIPT.replace("İşlem başarıyla gerçekleşti.", "İşlem başarısız. Tamamlandı.");
        let record = TurkiyeFinansExtractor.extract(&ReceiptText::new(text)).unwrap();
        assert_eq!(record.tr_status, StatusOutcome::Failed);
    }
}
