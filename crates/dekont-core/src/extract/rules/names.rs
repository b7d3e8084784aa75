//! Party name acceptance and cleanup.
//!
//! Text layers interleave labels, amounts and IBANs with names, so every name
//! candidate goes through [`looks_like_name`] before it is reported.

use lazy_static::lazy_static;
use regex::Regex;

use super::labels::{clean_value, value_after};
use super::patterns::{CURRENCY_TOKEN, NAME_TRAILING_JUNK, THREE_DIGITS};

lazy_static! {
    static ref IBAN_START: Regex = Regex::new(r"(?i)^TR\s*\d").unwrap();
    static ref ALPHA_RUN: Regex = Regex::new(r"\p{Alphabetic}{2,}").unwrap();
    static ref JUNK_TOKENS: Regex = Regex::new(r"(?i)\b(?:TR|BSMV|TRY|TL)\b").unwrap();

    // Words that mark a label or a money line rather than a person or company.
    static ref LABEL_WORDS: Regex = Regex::new(
        r"(?i)\b(?:BSMV|VERG[İI]|ÜCRET|UCRET|TOPLAM|TUTAR[Iı]?|MASRAF|KOM[İI]SYON|AÇIKLAMA|ACIKLAMA)\b"
    ).unwrap();
}

/// Whether `candidate` can be a party name.
///
/// Rejects strings carrying a currency token, three or more consecutive
/// digits, an IBAN start, a trailing label colon or money-line words, and
/// strings with no alphabetic run of at least two letters.
pub fn looks_like_name(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate.ends_with(':') {
        return false;
    }
    if CURRENCY_TOKEN.is_match(candidate)
        || THREE_DIGITS.is_match(candidate)
        || IBAN_START.is_match(candidate)
        || LABEL_WORDS.is_match(candidate)
    {
        return false;
    }
    ALPHA_RUN.is_match(candidate)
}

/// Strip trailing tokens that text layers glue onto a name.
pub fn clean_name(raw: &str) -> Option<String> {
    let value = clean_value(raw)?;
    let value = NAME_TRAILING_JUNK.replace(&value, "");
    let value = JUNK_TOKENS.replace_all(&value, " ");
    clean_value(&value)
}

/// Clean `raw` and keep it only when it looks like a name.
pub fn accept_name(raw: &str) -> Option<String> {
    clean_name(raw).filter(|name| looks_like_name(name))
}

/// Name after a label (same line, else next non-blank line), validated.
pub fn name_after(text: &str, label: &Regex, stop: Option<&Regex>) -> Option<String> {
    value_after(text, label, stop).and_then(|v| accept_name(&v))
}

/// First capture group of `re` that passes the name checks.
pub fn name_from_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| accept_name(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejects_money_and_ibans() {
        assert!(!looks_like_name("1.250,00 TL"));
        assert!(!looks_like_name("TR33 0006 1005"));
        assert!(!looks_like_name("Referans 123456"));
        assert!(!looks_like_name("ALICI ADI:"));
        assert!(!looks_like_name("BSMV"));
        assert!(!looks_like_name("- / 7"));
    }

    #[test]
    fn test_accepts_turkish_names() {
        assert!(looks_like_name("AYŞE YILMAZ"));
        assert!(looks_like_name("Çağrı Öztürk"));
        assert!(looks_like_name("ABC GIDA SAN. VE TİC. LTD. ŞTİ."));
    }

    #[test]
    fn test_clean_name_strips_trailing_junk() {
        assert_eq!(clean_name("MEHMET DEMİR TR").as_deref(), Some("MEHMET DEMİR"));
        assert_eq!(clean_name("MEHMET DEMİR BSMV :").as_deref(), Some("MEHMET DEMİR"));
        assert_eq!(clean_name("  ").as_deref(), None);
    }

    #[test]
    fn test_name_after_label() {
        let text = "Alıcı Adı: ZEYNEP KAYA\nTutar: 100,00 TL";
        let label = Regex::new(r"(?i)al[ıi]c[ıi] ad[ıi]").unwrap();
        assert_eq!(name_after(text, &label, None).as_deref(), Some("ZEYNEP KAYA"));

        let text = "Alıcı Adı: 100,00 TL";
        assert_eq!(name_after(text, &label, None), None);
    }
}
