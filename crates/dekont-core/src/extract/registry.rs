//! Classification key to extractor mapping.
//!
//! Every detector key resolves here, together with the issuer+variant
//! composites and historical aliases. Dispatch never fails: a missing key or
//! a failing extractor comes back as a [`FieldRecord`] with `error` set, so
//! callers can tell "not attempted" apart from "found nothing".

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use lazy_static::lazy_static;
use tracing::{debug, info, warn};

use super::banks::{
    akbank::AkbankExtractor, albaraka::AlbarakaExtractor, denizbank::DenizBankExtractor,
    enpara::EnparaExtractor, fibabanka::FibabankaExtractor, garanti::GarantiExtractor,
    halkbank::HalkbankExtractor, ing::IngExtractor, isbank::IsbankExtractor,
    kuveytturk::{KuveytTemplate, KuveytTurkExtractor},
    pttbank::PttBankExtractor, qnb::QnbExtractor, teb::TebExtractor, tombank::TomBankExtractor,
    turkiye_finans::TurkiyeFinansExtractor, upt::UptExtractor, vakif_katilim::VakifKatilimExtractor,
    vakifbank::VakifBankExtractor, yapikredi::YapiKrediExtractor, ziraat::ZiraatExtractor,
    ziraat_katilim::ZiraatKatilimExtractor,
};
use super::{Extractor, ReceiptText, TransferKind};
use crate::document::Document;
use crate::error::ExtractionError;
use crate::models::FieldRecord;

static ZIRAAT: ZiraatExtractor = ZiraatExtractor;
static ZIRAAT_KATILIM: ZiraatKatilimExtractor = ZiraatKatilimExtractor;
static YAPIKREDI: YapiKrediExtractor = YapiKrediExtractor::auto();
static YAPIKREDI_FAST: YapiKrediExtractor = YapiKrediExtractor::of(TransferKind::Fast);
static YAPIKREDI_HAVALE: YapiKrediExtractor = YapiKrediExtractor::of(TransferKind::Havale);
static AKBANK: AkbankExtractor = AkbankExtractor;
static DENIZBANK: DenizBankExtractor = DenizBankExtractor;
static ENPARA: EnparaExtractor = EnparaExtractor;
static GARANTI: GarantiExtractor = GarantiExtractor;
static VAKIFBANK: VakifBankExtractor = VakifBankExtractor;
static VAKIF_KATILIM: VakifKatilimExtractor = VakifKatilimExtractor;
static TEB: TebExtractor = TebExtractor;
static KUVEYT_TURK: KuveytTurkExtractor = KuveytTurkExtractor::auto();
static KUVEYT_TURK_EN: KuveytTurkExtractor = KuveytTurkExtractor::of(KuveytTemplate::English);
static KUVEYT_TURK_TR: KuveytTurkExtractor = KuveytTurkExtractor::of(KuveytTemplate::Turkish);
static KUVEYT_TURK_AR: KuveytTurkExtractor = KuveytTurkExtractor::of(KuveytTemplate::Arabic);
static ING: IngExtractor = IngExtractor;
static TURKIYE_FINANS: TurkiyeFinansExtractor = TurkiyeFinansExtractor;
static ISBANK: IsbankExtractor = IsbankExtractor;
static HALKBANK: HalkbankExtractor = HalkbankExtractor;
static QNB: QnbExtractor = QnbExtractor::auto();
static QNB_FAST: QnbExtractor = QnbExtractor::of(TransferKind::Fast);
static QNB_HAVALE: QnbExtractor = QnbExtractor::of(TransferKind::Havale);
static PTTBANK: PttBankExtractor = PttBankExtractor;
static TOMBANK: TomBankExtractor = TomBankExtractor;
static ALBARAKA: AlbarakaExtractor = AlbarakaExtractor;
static FIBABANKA: FibabankaExtractor = FibabankaExtractor;
static UPT: UptExtractor = UptExtractor;

lazy_static! {
    static ref DEFAULT_REGISTRY: ExtractorRegistry = ExtractorRegistry::builtin();
}

/// Static map from classification key to extractor.
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, &'static dyn Extractor>,
}

impl ExtractorRegistry {
    /// Every built-in layout, its composites and aliases.
    pub fn builtin() -> Self {
        let entries: [(&'static str, &'static dyn Extractor); 40] = [
            ("ZIRAAT", &ZIRAAT),
            ("ZIRAAT_FAST", &ZIRAAT),
            ("ZIRAAT_HAVALE", &ZIRAAT),
            ("ZIRAAT_KATILIM", &ZIRAAT_KATILIM),
            ("ZIRAATKATILIM", &ZIRAAT_KATILIM),
            ("YAPIKREDI", &YAPIKREDI),
            ("YAPI_BILGI", &YAPIKREDI),
            ("YAPI_EDEKONT", &YAPIKREDI),
            ("YAPIKREDI_FAST", &YAPIKREDI_FAST),
            ("YAPIKREDI_HAVALE", &YAPIKREDI_HAVALE),
            ("AKBANK", &AKBANK),
            ("DENIZBANK", &DENIZBANK),
            ("ENPARA", &ENPARA),
            ("GARANTI", &GARANTI),
            ("GARANTI_FAST", &GARANTI),
            ("GARANTI_HAVALE", &GARANTI),
            ("VAKIFBANK", &VAKIFBANK),
            ("VAKIFKATILIM", &VAKIF_KATILIM),
            ("VAKIF_KATILIM", &VAKIF_KATILIM),
            ("TEB", &TEB),
            ("KUVEYT_TURK", &KUVEYT_TURK),
            ("KuveytTurk", &KUVEYT_TURK),
            ("KUVEYT_TURK_EN", &KUVEYT_TURK_EN),
            ("KUVEYT_TURK_TR", &KUVEYT_TURK_TR),
            ("KUVEYT_TURK_AR", &KUVEYT_TURK_AR),
            ("ING", &ING),
            ("TURKIYE_FINANS", &TURKIYE_FINANS),
            ("TURKIYEFINANS", &TURKIYE_FINANS),
            ("ISBANK", &ISBANK),
            ("HALKBANK", &HALKBANK),
            ("QNB", &QNB),
            ("QNB_FAST", &QNB_FAST),
            ("QNB_HAVALE", &QNB_HAVALE),
            ("PTTBANK", &PTTBANK),
            ("PTT", &PTTBANK),
            ("TOMBANK", &TOMBANK),
            ("TOM", &TOMBANK),
            ("ALBARAKA", &ALBARAKA),
            ("FIBABANKA", &FIBABANKA),
            ("UPT", &UPT),
        ];

        Self {
            extractors: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'static dyn Extractor> {
        self.extractors.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.extractors.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.extractors.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Acquire text for the key's extractor and run it.
    pub fn dispatch(&self, key: &str, document: &Document) -> FieldRecord {
        let Some(extractor) = self.get(key) else {
            return no_extractor(key);
        };
        let text = ReceiptText::acquire(document, extractor.max_pages(), extractor.text_policy());
        debug!(
            "Extracting {} from {} chars ({})",
            key,
            text.raw.len(),
            text.method
        );
        run(key, extractor, &text)
    }

    /// Run the key's extractor on text acquired elsewhere.
    pub fn dispatch_text(&self, key: &str, text: &ReceiptText<'_>) -> FieldRecord {
        match self.get(key) {
            Some(extractor) => run(key, extractor, text),
            None => no_extractor(key),
        }
    }
}

fn no_extractor(key: &str) -> FieldRecord {
    let error = ExtractionError::NoExtractor(key.to_string());
    warn!("{}", error);
    FieldRecord::from_error(error.to_string())
}

fn run(key: &str, extractor: &dyn Extractor, text: &ReceiptText<'_>) -> FieldRecord {
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(text)));

    let record = match outcome {
        Ok(Ok(record)) => record,
        Ok(Err(e)) => {
            warn!("{}", e);
            FieldRecord::from_error(e.to_string())
        }
        Err(payload) => {
            let error = ExtractionError::Panicked {
                key: key.to_string(),
                message: panic_message(payload.as_ref()),
            };
            warn!("{}", error);
            FieldRecord::from_error(error.to_string())
        }
    };

    info!(
        "Extracted {} fields for {} ({}) in {:?}",
        record.filled_fields(),
        key,
        record.tr_status,
        start.elapsed()
    );
    record
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Extractor for a key in the built-in registry.
pub fn lookup(key: &str) -> Option<&'static dyn Extractor> {
    DEFAULT_REGISTRY.get(key)
}

/// Keys of the built-in registry, sorted.
pub fn registered_keys() -> Vec<&'static str> {
    DEFAULT_REGISTRY.keys()
}

/// Dispatch through the built-in registry.
pub fn dispatch(key: &str, document: &Document) -> FieldRecord {
    DEFAULT_REGISTRY.dispatch(key, document)
}

/// Dispatch pre-acquired text through the built-in registry.
pub fn dispatch_text(key: &str, text: &ReceiptText<'_>) -> FieldRecord {
    DEFAULT_REGISTRY.dispatch_text(key, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::rules;
    use crate::models::{Issuer, StatusOutcome};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_rule_key_is_registered() {
        for rule in rules() {
            assert!(lookup(rule.key).is_some(), "rule key {} not registered", rule.key);
        }
    }

    #[test]
    fn test_composites_and_aliases_resolve() {
        for key in [
            "GARANTI_FAST",
            "GARANTI_HAVALE",
            "YAPIKREDI_FAST",
            "YAPIKREDI_HAVALE",
            "QNB_FAST",
            "QNB_HAVALE",
            "KUVEYT_TURK_EN",
            "KUVEYT_TURK_TR",
            "KUVEYT_TURK_AR",
            "KuveytTurk",
            "TOM",
            "PTT",
            "TURKIYEFINANS",
            "VAKIF_KATILIM",
            "ZIRAATKATILIM",
        ] {
            assert!(lookup(key).is_some(), "{key} not registered");
        }
        assert_eq!(lookup("TOM").map(|e| e.issuer()), Some(Issuer::TomBank));
    }

    #[test]
    fn test_unregistered_key_yields_error_record() {
        let doc = Document::from_text_layer("anything");
        let record = dispatch("NO_SUCH_BANK", &doc);
        assert_eq!(
            record.error.as_deref(),
            Some("No extractor registered for key: NO_SUCH_BANK")
        );
        assert_eq!(record.filled_fields(), 0);
        assert_eq!(record.tr_status, StatusOutcome::Unknown);
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let record = dispatch("AKBANK", &Document::from_text_layer(""));
        assert!(!record.is_error());
        assert_eq!(record.filled_fields(), 0);
    }

    struct Failing;

    impl Extractor for Failing {
        fn issuer(&self) -> Issuer {
            Issuer::Upt
        }

        fn extract(&self, _text: &ReceiptText<'_>) -> crate::extract::Result<FieldRecord> {
            Err(ExtractionError::Failed {
                key: "UPT".into(),
                reason: "layout not recognized".into(),
            })
        }
    }

    struct Panicking;

    impl Extractor for Panicking {
        fn issuer(&self) -> Issuer {
            Issuer::Upt
        }

        fn extract(&self, _text: &ReceiptText<'_>) -> crate::extract::Result<FieldRecord> {
            panic!("index out of range")
        }
    }

    #[test]
    fn test_failures_become_error_records() {
        let text = ReceiptText::new("upt.com.tr");

        let record = run("UPT", &Failing, &text);
        assert_eq!(
            record.error.as_deref(),
            Some("UPT extractor failed: layout not recognized")
        );

        let record = run("UPT", &Panicking, &text);
        assert_eq!(
            record.error.as_deref(),
            Some("UPT extractor panicked: index out of range")
        );
        assert_eq!(record.filled_fields(), 0);
    }
}
