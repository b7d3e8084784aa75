//! End-to-end checks over pre-acquired text and a fake OCR engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dekont_core::{
    check, classify, dispatch, normalize, Classification, DetectionMethod, Document, OcrError,
    Pipeline, StatusOutcome, TextRecognizer,
};
use image::DynamicImage;
use pretty_assertions::assert_eq;

struct FixedRecognizer {
    text: &'static str,
    calls: AtomicUsize,
}

impl FixedRecognizer {
    fn new(text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            text,
            calls: AtomicUsize::new(0),
        })
    }
}

impl TextRecognizer for FixedRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

const ZIRAAT_FAST: &str = r"T.C. ZİRAAT BANKASI A.Ş.
www.ziraatbank.com.tr
HESAPTAN FAST
İşlemi gerçekleştirilmiştir.";

const ALBARAKA_SCAN: &str = r"ALBARAKA TÜRK KATILIM BANKASI A.Ş.
DEKONT
SAYIN HESAP SAHİBİ : MURAT GÜNEŞ
Alıcı Adı : SİBEL UÇAR
Alıcı Hesap/IBAN No : TR33 0006 1005 1978 6457 8413 26
Tutar : 41.424,00 TRY
İşlem Tarihi : 09.02.2026 21:27:56";

#[test]
fn test_ziraat_fast_classification() {
    let doc = Document::from_text_layer(ZIRAAT_FAST);
    assert_eq!(
        classify(&doc),
        Classification {
            key: "ZIRAAT_FAST".to_string(),
            bank: "Ziraat".to_string(),
            variant: Some("FAST".to_string()),
            method: DetectionMethod::Text,
        }
    );
}

#[test]
fn test_spaced_iban_is_canonical() {
    let doc = Document::from_text_layer(
        "www.isbank.com.tr\nAlıcı Hesap : AYŞE KAYA TR 12 0001 0012 3456 7890 1234 56",
    );
    let report = check(&doc);
    assert_eq!(report.detected.key, "ISBANK");
    assert_eq!(
        report.data.receiver_iban.as_deref(),
        Some("TR120001001234567890123456")
    );
}

#[test]
fn test_completion_needs_issuer_wording() {
    let doc = Document::from_text_layer(ZIRAAT_FAST);
    assert_eq!(check(&doc).data.tr_status, StatusOutcome::Completed);

    let without = ZIRAAT_FAST.replace("İşlemi gerçekleştirilmiştir.", "");
    let doc = Document::from_text_layer(without);
    assert_eq!(check(&doc).data.tr_status, StatusOutcome::Unknown);
}

#[test]
fn test_unregistered_key_is_explicit() {
    let record = dispatch("NOT_A_BANK", &Document::from_text_layer(ZIRAAT_FAST));
    assert!(record.is_error());
    assert_eq!(record.filled_fields(), 0);
}

#[test]
fn test_unknown_document() {
    let report = check(&Document::from_text_layer("Market fişi\nToplam 12,50 TL"));
    assert!(report.detected.is_unknown());
    assert_eq!(report.detected.method, DetectionMethod::None);
    assert_eq!(report.data.tr_status, StatusOutcome::Unknown);
}

#[test]
fn test_checking_is_deterministic() {
    let first = check(&Document::from_text_layer(ZIRAAT_FAST));
    let second = check(&Document::from_text_layer(ZIRAAT_FAST));
    assert_eq!(first.detected, second.detected);
    assert_eq!(first.data, second.data);
}

#[test]
fn test_normalize_is_idempotent() {
    for text in [ZIRAAT_FAST, ALBARAKA_SCAN, "  İİ ıı \u{200f}Ş\tğ  "] {
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn test_image_only_receipt_goes_through_ocr_once() {
    let recognizer = FixedRecognizer::new(ALBARAKA_SCAN);
    let doc = Document::from_text_layer("")
        .with_recognizer(recognizer.clone())
        .with_page_image(DynamicImage::new_rgb8(8, 8));

    let report = Pipeline::new().check(&doc);
    assert_eq!(report.detected.key, "ALBARAKA");
    assert_eq!(report.detected.method, DetectionMethod::Ocr);
    assert_eq!(report.data.tr_status, StatusOutcome::Completed);
    assert_eq!(report.data.receiver_name.as_deref(), Some("SİBEL UÇAR"));
    assert_eq!(
        report.data.receiver_iban.as_deref(),
        Some("TR330006100519786457841326")
    );
    assert_eq!(report.data.amount.as_deref(), Some("41.424,00 TL"));
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_ocr_is_not_attempted_without_engine() {
    let doc = Document::from_text_layer("").with_page_image(DynamicImage::new_rgb8(8, 8));
    let report = check(&doc);
    assert!(report.detected.is_unknown());
}
