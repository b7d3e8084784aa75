//! Second-pass variant refinement.
//!
//! Runs only after the issuer is fixed and only when the matching rule had
//! no variant of its own. Each sub-classifier looks at the same normalized
//! text the issuer was found in.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Issuer;

lazy_static! {
    static ref WORD_FAST: Regex = Regex::new(r"\bfast\b").unwrap();
    static ref WORD_HAVALE: Regex = Regex::new(r"\bhavale\b").unwrap();
    static ref ARABIC: Regex = Regex::new(r"\p{Arabic}").unwrap();
    static ref YAPI_HAVALE: Regex = Regex::new(
        r"havale\s?-\s?borc|dekont tipi\s?:\s?hvl|alacakli hesap"
    ).unwrap();
}

/// Refined key and variant label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refinement {
    pub key: &'static str,
    pub variant: &'static str,
}

impl Refinement {
    const fn new(key: &'static str, variant: &'static str) -> Self {
        Self { key, variant }
    }
}

/// Markers of the English Kuveyt Turk template.
const KUVEYT_EN_MARKERS: &[&str] = &[
    "transaction details",
    "sender name",
    "transactiondate",
    "transaction date",
    "amount",
];

/// Re-derive the layout variant for an issuer whose receipts vary.
pub fn refine(issuer: Issuer, normalized: &str) -> Option<Refinement> {
    match issuer {
        Issuer::Ziraat => {
            if WORD_FAST.is_match(normalized) {
                Some(Refinement::new("ZIRAAT_FAST", "FAST"))
            } else if WORD_HAVALE.is_match(normalized) {
                Some(Refinement::new("ZIRAAT_HAVALE", "Havale"))
            } else {
                None
            }
        }
        Issuer::YapiKredi => {
            if normalized.contains("fast gonderimi") {
                Some(Refinement::new("YAPIKREDI_FAST", "FAST"))
            } else if YAPI_HAVALE.is_match(normalized) {
                Some(Refinement::new("YAPIKREDI_HAVALE", "Havale"))
            } else {
                None
            }
        }
        Issuer::Garanti => {
            if normalized.contains("fast ref no") {
                Some(Refinement::new("GARANTI_FAST", "FAST"))
            } else if normalized.contains("alacakli hesap") {
                Some(Refinement::new("GARANTI_HAVALE", "Havale"))
            } else {
                None
            }
        }
        Issuer::Qnb => {
            if normalized.contains("hesaptan hesaba havale") {
                Some(Refinement::new("QNB_HAVALE", "Havale"))
            } else if normalized.contains("giden fast eft") {
                Some(Refinement::new("QNB_FAST", "FAST"))
            } else {
                None
            }
        }
        Issuer::KuveytTurk => Some(kuveyt_template(normalized)),
        _ => None,
    }
}

fn kuveyt_template(normalized: &str) -> Refinement {
    if ARABIC.is_match(normalized) {
        Refinement::new("KUVEYT_TURK_AR", "AR")
    } else if KUVEYT_EN_MARKERS.iter().any(|m| normalized.contains(m)) {
        Refinement::new("KUVEYT_TURK_EN", "EN")
    } else {
        Refinement::new("KUVEYT_TURK_TR", "TR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ziraat_generic_refined() {
        let refined = refine(Issuer::Ziraat, "ziraatbank.com.tr dekont fast islemi");
        assert_eq!(refined, Some(Refinement::new("ZIRAAT_FAST", "FAST")));
        assert_eq!(refine(Issuer::Ziraat, "ziraatbank.com.tr dekont"), None);
    }

    #[test]
    fn test_yapikredi_havale_markers() {
        assert_eq!(
            refine(Issuer::YapiKredi, "dekont tipi : hvl islem").map(|r| r.key),
            Some("YAPIKREDI_HAVALE")
        );
        assert_eq!(
            refine(Issuer::YapiKredi, "fast gonderimi alici").map(|r| r.key),
            Some("YAPIKREDI_FAST")
        );
    }

    #[test]
    fn test_garanti_and_qnb() {
        assert_eq!(refine(Issuer::Garanti, "fast ref no : 1").map(|r| r.variant), Some("FAST"));
        assert_eq!(refine(Issuer::Qnb, "hesaptan hesaba havale").map(|r| r.variant), Some("Havale"));
        assert_eq!(refine(Issuer::Qnb, "giden fast eft").map(|r| r.key), Some("QNB_FAST"));
    }

    #[test]
    fn test_kuveyt_templates() {
        assert_eq!(refine(Issuer::KuveytTurk, "sender name ali").map(|r| r.variant), Some("EN"));
        assert_eq!(refine(Issuer::KuveytTurk, "gonderen kisi ali").map(|r| r.variant), Some("TR"));
        assert_eq!(refine(Issuer::KuveytTurk, "اسم المرسل ali").map(|r| r.variant), Some("AR"));
    }

    #[test]
    fn test_issuers_without_variants() {
        assert_eq!(refine(Issuer::Akbank, "fast havale"), None);
    }
}
