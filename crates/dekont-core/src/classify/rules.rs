//! The priority-ordered detector rule table.
//!
//! Rules are evaluated top to bottom within a stage and the first match
//! wins. Within an issuer, variant rules come before the generic rule.
//! Issuers often named as a counterparty on other banks' receipts require
//! corroborating receipt wording next to their domain.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Issuer;

/// Which text a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Issuer website domain in the normalized text layer.
    Text,
    /// Legal-entity name in the normalized text layer.
    Name,
    /// Allow-listed issuers, on the normalized OCR text of page 1.
    Ocr,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Text => "text",
            Stage::Name => "name",
            Stage::Ocr => "ocr",
        }
    }
}

/// Match condition over normalized text.
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// Issuer domain present.
    Domain(&'static str),
    /// Domain present and at least one of the phrases.
    DomainWithAny(&'static str, &'static [&'static str]),
    /// Domain present and every phrase.
    DomainWithAll(&'static str, &'static [&'static str]),
    /// One of the legal names present and at least one corroborating phrase.
    NameWithAny(&'static [&'static str], &'static [&'static str]),
}

impl Predicate {
    fn domain(&self) -> Option<&'static str> {
        match *self {
            Predicate::Domain(d) | Predicate::DomainWithAny(d, _) | Predicate::DomainWithAll(d, _) => {
                Some(d)
            }
            Predicate::NameWithAny(..) => None,
        }
    }
}

/// One entry of the rule table.
#[derive(Debug)]
pub struct Rule {
    pub key: &'static str,
    pub issuer: Issuer,
    pub variant: Option<&'static str>,
    pub stage: Stage,
    pub predicate: Predicate,
    domain_pattern: Option<Regex>,
}

impl Rule {
    fn new(
        key: &'static str,
        issuer: Issuer,
        variant: Option<&'static str>,
        stage: Stage,
        predicate: Predicate,
    ) -> Self {
        Self {
            key,
            issuer,
            variant,
            stage,
            predicate,
            domain_pattern: predicate.domain().and_then(|d| domain_regex(d).ok()),
        }
    }

    /// Evaluate against normalized text.
    pub fn matches(&self, normalized: &str) -> bool {
        let has_domain = || {
            self.domain_pattern
                .as_ref()
                .is_some_and(|re| re.is_match(normalized))
        };
        match self.predicate {
            Predicate::Domain(_) => has_domain(),
            Predicate::DomainWithAny(_, phrases) => {
                has_domain() && phrases.iter().any(|p| normalized.contains(p))
            }
            Predicate::DomainWithAll(_, phrases) => {
                has_domain() && phrases.iter().all(|p| normalized.contains(p))
            }
            Predicate::NameWithAny(names, phrases) => {
                names.iter().any(|n| normalized.contains(n))
                    && phrases.iter().any(|p| normalized.contains(p))
            }
        }
    }

    /// Short human description of the predicate.
    pub fn describe(&self) -> String {
        match self.predicate {
            Predicate::Domain(d) => d.to_string(),
            Predicate::DomainWithAny(d, phrases) => format!("{d} + any of {phrases:?}"),
            Predicate::DomainWithAll(d, phrases) => format!("{d} + all of {phrases:?}"),
            Predicate::NameWithAny(names, phrases) => format!("{names:?} + any of {phrases:?}"),
        }
    }
}

/// Regex for a domain as it appears in extracted text.
///
/// Text layers break domains apart (`ziraatbank. com.tr`, `akbank .com`),
/// so a single optional space is allowed between any two characters. The
/// domain must not be glued to a longer host name on the left or a longer
/// label on the right.
pub fn domain_regex(domain: &str) -> Result<Regex, regex::Error> {
    let body = domain
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(r"\s?");
    Regex::new(&format!(r"(?:^|[^a-z0-9]){body}(?:[^a-z]|$)"))
}

const CORROBORATION_ZIRAAT: &[&str] = &["dekont", "ziraat bankasi"];
const CORROBORATION_KUVEYT: &[&str] = &[
    "dekont",
    "hesap sahibi",
    "account holder",
    "e-receipt",
    "transaction details",
    "musteri adi",
];

lazy_static! {
    static ref RULES: Vec<Rule> = {
        use Predicate::*;
        use Stage::*;

        vec![
            // Ziraat: variants, then generic with corroboration.
            Rule::new("ZIRAAT_FAST", Issuer::Ziraat, Some("FAST"), Text,
                DomainWithAny("ziraatbank.com.tr", &["hesaptan fast", "fast mesaj kodu", "fast sorgu no"])),
            Rule::new("ZIRAAT_HAVALE", Issuer::Ziraat, Some("Havale"), Text,
                DomainWithAny("ziraatbank.com.tr", &["hesaptan hesaba havale", "havale tutari"])),
            Rule::new("ZIRAAT", Issuer::Ziraat, None, Text,
                DomainWithAny("ziraatbank.com.tr", CORROBORATION_ZIRAAT)),
            Rule::new("ZIRAAT_KATILIM", Issuer::ZiraatKatilim, None, Text,
                Domain("ziraatkatilim.com.tr")),

            // Yapi Kredi: information slip before e-receipt before generic.
            Rule::new("YAPI_BILGI", Issuer::YapiKredi, Some("Bilgi Dekontu"), Text,
                DomainWithAll("yapikredi.com.tr", &["bilgi dekontu", "e-dekont yerine gecmez"])),
            Rule::new("YAPI_EDEKONT", Issuer::YapiKredi, Some("e-Dekont"), Text,
                DomainWithAll("yapikredi.com.tr", &["e-dekont", "elektronik ortamda uretilmistir"])),
            Rule::new("YAPIKREDI", Issuer::YapiKredi, None, Text, Domain("yapikredi.com.tr")),

            Rule::new("AKBANK", Issuer::Akbank, None, Text, Domain("akbank.com")),
            Rule::new("DENIZBANK", Issuer::DenizBank, None, Text, Domain("denizbank.com")),
            Rule::new("ENPARA", Issuer::Enpara, None, Text, Domain("enpara.com")),
            Rule::new("GARANTI", Issuer::Garanti, None, Text, Domain("garantibbva.com.tr")),
            Rule::new("VAKIFBANK", Issuer::VakifBank, None, Text, Domain("vakifbank.com.tr")),
            Rule::new("VAKIFKATILIM", Issuer::VakifKatilim, None, Text, Domain("vakifkatilim.com.tr")),
            Rule::new("TEB", Issuer::Teb, None, Text, Domain("teb.com.tr")),
            Rule::new("KUVEYT_TURK", Issuer::KuveytTurk, None, Text,
                DomainWithAny("kuveytturk.com.tr", CORROBORATION_KUVEYT)),
            Rule::new("ING", Issuer::Ing, None, Text, Domain("ing.com.tr")),
            Rule::new("TURKIYE_FINANS", Issuer::TurkiyeFinans, None, Text, Domain("turkiyefinans.com.tr")),
            Rule::new("ISBANK", Issuer::Isbank, None, Text, Domain("isbank.com.tr")),
            Rule::new("HALKBANK", Issuer::Halkbank, None, Text, Domain("halkbank.com.tr")),
            Rule::new("QNB", Issuer::Qnb, None, Text, Domain("qnb.com.tr")),
            Rule::new("PTTBANK", Issuer::PttBank, None, Text, Domain("pttbank.ptt.gov.tr")),
            Rule::new("TOMBANK", Issuer::TomBank, None, Text, Domain("tombank.com.tr")),
            Rule::new("ALBARAKA", Issuer::Albaraka, None, Text, Domain("albaraka.com.tr")),
            Rule::new("FIBABANKA", Issuer::Fibabanka, None, Text, Domain("fibabanka.com.tr")),
            Rule::new("UPT", Issuer::Upt, None, Text, Domain("upt.com.tr")),

            // Receipts that print the legal name but no website.
            Rule::new("DENIZBANK", Issuer::DenizBank, None, Name,
                NameWithAny(&["denizbank a.s."], &["dekont"])),
            Rule::new("KUVEYT_TURK", Issuer::KuveytTurk, None, Name,
                NameWithAny(&["kuveyt turk katilim bankasi"], CORROBORATION_KUVEYT)),
            Rule::new("ZIRAAT_KATILIM", Issuer::ZiraatKatilim, None, Name,
                NameWithAny(&["ziraat katilim bankasi"], &["dekont", "fast"])),
            Rule::new("ALBARAKA", Issuer::Albaraka, None, Name,
                NameWithAny(&["albaraka turk katilim bankasi", "albaraka turk"],
                    &["dekont", "albaraka.com.tr"])),
            Rule::new("FIBABANKA", Issuer::Fibabanka, None, Name,
                NameWithAny(&["fibabanka a.s."], &["dekont"])),

            // Image-only receipts, resolved on OCR text.
            Rule::new("ALBARAKA", Issuer::Albaraka, None, Ocr, Domain("albaraka.com.tr")),
            Rule::new("ALBARAKA", Issuer::Albaraka, None, Ocr,
                NameWithAny(&["albaraka"], &["dekont", "islem", "iban"])),
            Rule::new("ZIRAAT_KATILIM", Issuer::ZiraatKatilim, None, Ocr, Domain("ziraatkatilim.com.tr")),
            Rule::new("ZIRAAT_KATILIM", Issuer::ZiraatKatilim, None, Ocr,
                NameWithAny(&["ziraat katilim"], &["dekont", "fast", "iban"])),
        ]
    };
}

/// The full rule table in evaluation order.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Rules of one stage, in evaluation order.
pub fn stage_rules(stage: Stage) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |r| r.stage == stage)
}
