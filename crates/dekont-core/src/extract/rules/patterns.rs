//! Common regex patterns for receipt field extraction.
//!
//! Turkish labels come out of text layers in every casing and with or
//! without diacritics, so patterns use `(?i)` plus explicit classes for the
//! dotted/dotless i pair (`[iıİI]`), which case-insensitive matching does
//! not unify.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // IBAN: "TR" then 24 digits (or mask stars), tolerant of spaces/line breaks.
    pub static ref IBAN_SPACED: Regex = Regex::new(
        r"(?i)\bTR(?:[ \t\r\n]*[0-9*]){24}"
    ).unwrap();

    // Loose IBAN start used by OCR-tolerant readers.
    pub static ref IBAN_LOOSE: Regex = Regex::new(
        r"(?i)\bT\s*R\s*[0-9OoDIl|SsBZzG][0-9OoDIl|SsBZzG\s]{20,40}"
    ).unwrap();

    // Amount followed by a Turkish lira marker.
    pub static ref AMOUNT_TL: Regex = Regex::new(
        r"(?i)(\d{1,3}(?:[.,]\d{3})+(?:[.,]\d{1,2})?|\d+(?:[.,]\d{1,2})?)\s*(TL|TRY)\b"
    ).unwrap();

    // Lira marker followed by an amount ("TL 1.250,00").
    pub static ref TL_AMOUNT: Regex = Regex::new(
        r"(?i)\b(?:TL|TRY)\s*(\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{1,2})?|\d+(?:[.,]\d{1,2})?)"
    ).unwrap();

    // Bare decimal amount ("1.250,00", "25,718.00").
    pub static ref AMOUNT_BARE: Regex = Regex::new(
        r"\b\d{1,3}(?:[.,]\d{3})*[.,]\d{2}\b"
    ).unwrap();

    // Date and time, separators . / -, digits possibly split by stray spaces.
    pub static ref DATE_TIME: Regex = Regex::new(
        r"(\d\s?\d?)\s*[./-]\s*(\d\s?\d?)\s*[./-]\s*(\d\s?\d\s?\d\s?\d)(?:\s*[-–,]?\s*|\s+)(\d\s?\d)\s*[:.]\s*(\d\s?\d)(?:\s*[:.]\s*(\d\s?\d))?"
    ).unwrap();

    // Date without time.
    pub static ref DATE_ONLY: Regex = Regex::new(
        r"(\d{1,2})\s*[./-]\s*(\d{1,2})\s*[./-]\s*(\d{4})"
    ).unwrap();

    // ISO-ordered stamp "2026-01-31-20.39.54" / "2026-01-31 20:39".
    pub static ref DATE_TIME_ISO: Regex = Regex::new(
        r"(\d{4})-(\d{2})-(\d{2})[-\sT](\d{2})[.:](\d{2})(?:[.:](\d{2}))?"
    ).unwrap();

    // Time of day.
    pub static ref TIME_ONLY: Regex = Regex::new(
        r"\b(\d{2}):(\d{2})(?::(\d{2}))?\b"
    ).unwrap();

    // Long digit runs used for query / reference numbers.
    pub static ref DIGITS_6_PLUS: Regex = Regex::new(r"\b\d{6,}\b").unwrap();

    // Currency tokens that disqualify a name candidate.
    pub static ref CURRENCY_TOKEN: Regex = Regex::new(
        r"(?i)\b(?:TL|TRY|USD|EUR|GBP)\b|[₺$€£]"
    ).unwrap();

    pub static ref THREE_DIGITS: Regex = Regex::new(r"\d{3,}").unwrap();

    // Trailing junk that text layers glue onto names.
    pub static ref NAME_TRAILING_JUNK: Regex = Regex::new(
        r"(?i)(?:\s+(?:TR\d*|BSMV|TL|TRY|IBAN|[:\-/]))+\s*$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iban_spaced() {
        assert!(IBAN_SPACED.is_match("TR 12 0001 0012 3456 7890 1234 56"));
        assert!(IBAN_SPACED.is_match("tr120001001234567890123456"));
        assert!(IBAN_SPACED.is_match("TR12 0001 **** **** **** 1234 56"));
        assert!(!IBAN_SPACED.is_match("TR12 0001 0012"));
    }

    #[test]
    fn test_date_time_spaced_digits() {
        let caps = DATE_TIME.captures("3 1.01.2 026 1 4:05").unwrap();
        assert_eq!(&caps[1], "3 1");
        assert_eq!(&caps[3], "2 026");
        assert_eq!(&caps[4], "1 4");
    }

    #[test]
    fn test_amount_tl() {
        let caps = AMOUNT_TL.captures("Tutar: 1.250,00 TL").unwrap();
        assert_eq!(&caps[1], "1.250,00");
        assert!(AMOUNT_TL.is_match("500 TRY"));
    }
}
