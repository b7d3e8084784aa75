//! Amount extraction for receipts.
//!
//! Amounts are reported the way the receipt prints them, with the currency
//! normalized to `TL`. Candidates are compared as decimals so that the
//! largest-amount fallback is numeric, not lexical.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_BARE, AMOUNT_TL, TL_AMOUNT};
use super::{ExtractionMatch, FieldExtractor};

/// An amount as printed plus its numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountCandidate {
    /// Number exactly as printed, e.g. `1.250,00`.
    pub text: String,
    pub value: Decimal,
}

impl AmountCandidate {
    fn parse(text: &str) -> Option<Self> {
        let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let text = text.trim_start_matches(['-', '+']).to_string();
        let value = parse_amount(&text)?;
        Some(Self { text, value })
    }

    /// Display form, `<number> TL`.
    pub fn display(&self) -> String {
        format!("{} TL", self.text)
    }
}

/// Amount field extractor over "number + TL/TRY" and "TL + number" forms.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<AmountCandidate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in AMOUNT_TL.captures_iter(text) {
            if let (Some(full), Some(candidate)) = (caps.get(0), AmountCandidate::parse(&caps[1])) {
                results.push(
                    ExtractionMatch::new(candidate, 0.8, full.as_str())
                        .with_position(full.start(), full.end()),
                );
            }
        }

        for caps in TL_AMOUNT.captures_iter(text) {
            let Some(full) = caps.get(0) else { continue };
            if results
                .iter()
                .any(|r| r.position.is_some_and(|(s, e)| s < full.end() && full.start() < e))
            {
                continue;
            }
            if let Some(candidate) = AmountCandidate::parse(&caps[1]) {
                results.push(
                    ExtractionMatch::new(candidate, 0.7, full.as_str())
                        .with_position(full.start(), full.end()),
                );
            }
        }

        results.sort_by_key(|r| r.position.map(|(s, _)| s).unwrap_or(usize::MAX));
        results
    }
}

/// Parse a printed amount in Turkish (`1.250,50`) or English (`1,250.50`) notation.
///
/// With a single kind of separator, a trailing group of exactly three digits
/// is read as thousands (`50.000` is fifty thousand).
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    let decimal_sep = match (last_dot, last_comma) {
        (Some(d), Some(c)) => Some(if d > c { '.' } else { ',' }),
        (Some(i), None) | (None, Some(i)) => {
            let sep = cleaned.as_bytes()[i] as char;
            let tail = cleaned.len() - i - 1;
            let repeated = cleaned.matches(sep).count() > 1;
            if tail == 3 || repeated { None } else { Some(sep) }
        }
        (None, None) => None,
    };

    let normalized: String = match decimal_sep {
        Some(sep) => {
            let idx = cleaned.rfind(sep)?;
            let int_part: String = cleaned[..idx].chars().filter(char::is_ascii_digit).collect();
            format!("{}.{}", if int_part.is_empty() { "0" } else { &int_part }, &cleaned[idx + 1..])
        }
        None => cleaned.chars().filter(char::is_ascii_digit).collect(),
    };

    Decimal::from_str(&normalized).ok()
}

/// All amount candidates in `text`.
pub fn extract_amounts(text: &str) -> Vec<AmountCandidate> {
    AmountExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// The numerically largest "amount + currency" in `text`.
pub fn largest_amount(text: &str) -> Option<String> {
    extract_amounts(text)
        .into_iter()
        .max_by(|a, b| a.value.cmp(&b.value))
        .map(|c| c.display())
}

/// First amount following a label: on the label's line, else on the next
/// non-blank line. Accepts bare numbers there since labels like
/// "İşlem Tutarı (TL)" carry the currency themselves.
pub fn amount_after(text: &str, label: &Regex) -> Option<String> {
    let m = label.find(text)?;
    let rest = &text[m.end()..];

    let mut lines = rest.lines();
    let same_line = lines.next().unwrap_or("");
    let next_line = lines.find(|l| !l.trim().is_empty()).unwrap_or("");

    [same_line, next_line]
        .into_iter()
        .find_map(first_amount_in_line)
        .map(|c| c.display())
}

fn first_amount_in_line(line: &str) -> Option<AmountCandidate> {
    if let Some(caps) = AMOUNT_TL.captures(line) {
        return AmountCandidate::parse(&caps[1]);
    }
    if let Some(caps) = TL_AMOUNT.captures(line) {
        return AmountCandidate::parse(&caps[1]);
    }
    AMOUNT_BARE
        .find(line)
        .and_then(|m| AmountCandidate::parse(m.as_str()))
}

/// Labeled amount if present, else the largest candidate on the page.
pub fn pick_amount(text: &str, label: Option<&Regex>) -> Option<String> {
    label
        .and_then(|label| amount_after(text, label))
        .or_else(|| largest_amount(text))
}

/// Normalize a captured amount string to `<number> TL`.
pub fn format_amount(raw: &str) -> Option<String> {
    AmountCandidate::parse(raw).map(|c| c.display())
}

/// Append `,00` to whole-lira amounts printed without decimals.
pub fn with_decimals(number: &str) -> String {
    if number.contains(',') {
        number.to_string()
    } else {
        format!("{number},00")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("1.250,50"), Some(dec("1250.50")));
        assert_eq!(parse_amount("25,718.00"), Some(dec("25718.00")));
        assert_eq!(parse_amount("250,5"), Some(dec("250.5")));
        assert_eq!(parse_amount("50.000"), Some(dec("50000")));
        assert_eq!(parse_amount("1.000.000"), Some(dec("1000000")));
        assert_eq!(parse_amount("12.50"), Some(dec("12.50")));
        assert_eq!(parse_amount("TL"), None);
    }

    #[test]
    fn test_largest_amount_wins_over_first() {
        let text = "Masraf 5,00 TL\nBSMV 0,25 TL\nTutar 12.500,00 TL\nToplam 12.505,25 TL";
        assert_eq!(largest_amount(text).as_deref(), Some("12.505,25 TL"));
    }

    #[test]
    fn test_labeled_amount_preferred() {
        let text = "Bakiye 90.000,00 TL\nİşlem Tutarı: 1.500,00 TRY";
        let label = Regex::new(r"(?i)[iİ]şlem\s+tutar[ıi]").unwrap();
        assert_eq!(pick_amount(text, Some(&label)).as_deref(), Some("1.500,00 TL"));
        assert_eq!(pick_amount(text, None).as_deref(), Some("90.000,00 TL"));
    }

    #[test]
    fn test_amount_on_next_line() {
        let text = "Tutar\n\n  750,00\nAçıklama";
        let label = Regex::new(r"(?i)tutar").unwrap();
        assert_eq!(amount_after(text, &label).as_deref(), Some("750,00 TL"));
    }

    #[test]
    fn test_tl_prefix_form() {
        let found = extract_amounts("TL 3.050,00 ödenmiştir");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display(), "3.050,00 TL");
    }

    #[test]
    fn test_with_decimals() {
        assert_eq!(with_decimals("1.500"), "1.500,00");
        assert_eq!(with_decimals("1.500,25"), "1.500,25");
    }
}
