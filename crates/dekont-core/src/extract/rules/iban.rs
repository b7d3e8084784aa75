//! Turkish IBAN extraction, canonicalization and validation.

use regex::Regex;

use super::patterns::{IBAN_LOOSE, IBAN_SPACED};
use super::{ExtractionMatch, FieldExtractor};

/// Digits after the `TR` prefix.
const TR_IBAN_DIGITS: usize = 24;

/// IBAN field extractor.
pub struct IbanExtractor {
    validate: bool,
}

impl IbanExtractor {
    /// Create a new IBAN extractor.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Keep only IBANs whose mod-97 checksum holds.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for IbanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IbanExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for m in IBAN_SPACED.find_iter(text) {
            let Some(iban) = canonical_iban(m.as_str()) else {
                continue;
            };
            if self.validate && !is_masked(&iban) && !validate_iban(&iban) {
                continue;
            }
            if results.iter().any(|r| r.value == iban) {
                continue;
            }

            let confidence = if is_masked(&iban) {
                0.5
            } else if validate_iban(&iban) {
                0.95
            } else {
                0.8
            };
            results.push(
                ExtractionMatch::new(iban, confidence, m.as_str()).with_position(m.start(), m.end()),
            );
        }

        results
    }
}

/// Whether an IBAN keeps masked digits.
pub fn is_masked(iban: &str) -> bool {
    iban.contains('*')
}

/// Canonical `TR` + 24 digits form, or the masked form when the source masks digits.
///
/// Whitespace and line breaks are dropped. Returns `None` when fewer than
/// 24 digit positions follow the prefix.
pub fn canonical_iban(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let body = compact.strip_prefix("TR")?;
    let positions: String = body
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '*')
        .take(TR_IBAN_DIGITS)
        .collect();

    if positions.chars().count() != TR_IBAN_DIGITS {
        return None;
    }
    Some(format!("TR{positions}"))
}

/// First IBAN in `text`.
pub fn extract_iban(text: &str) -> Option<String> {
    IbanExtractor::new().extract(text).map(|m| m.value)
}

/// Every distinct IBAN in `text`, in document order.
pub fn all_ibans(text: &str) -> Vec<String> {
    IbanExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// First IBAN after a label match.
pub fn iban_after(text: &str, label: &Regex) -> Option<String> {
    let m = label.find(text)?;
    extract_iban(&text[m.end()..])
}

/// First IBAN after a label, looking only at the next `window` bytes.
pub fn iban_near(text: &str, label: &Regex, window: usize) -> Option<String> {
    let m = label.find(text)?;
    let end = floor_char_boundary(text, m.end() + window);
    extract_iban(&text[m.end()..end])
}

/// Pick the receiver IBAN.
///
/// Tie-break: the first IBAN in the receiver-labeled region (from the
/// receiver label onwards), else the first IBAN in the whole text that is not
/// the sender's.
pub fn pick_receiver_iban(text: &str, receiver_label: Option<&Regex>, sender: Option<&str>) -> Option<String> {
    let not_sender = |iban: &String| sender.is_none_or(|s| s != iban);

    if let Some(m) = receiver_label.and_then(|label| label.find(text)) {
        if let Some(iban) = all_ibans(&text[m.end()..]).into_iter().find(not_sender) {
            return Some(iban);
        }
    }
    all_ibans(text).into_iter().find(not_sender)
}

/// IBAN from a labeled value, falling back to its digits when the layout
/// prints the account as `TR..` with stray punctuation in between.
pub fn iban_in_value(value: &str) -> Option<String> {
    if let Some(iban) = extract_iban(value) {
        return Some(iban);
    }
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    (value.to_uppercase().contains("TR") && digits.len() >= TR_IBAN_DIGITS)
        .then(|| format!("TR{}", &digits[..TR_IBAN_DIGITS]))
}

/// Canonicalize an OCR'd IBAN, repairing letters read in place of digits.
pub fn ocr_iban(text: &str) -> Option<String> {
    IBAN_LOOSE.find_iter(text).find_map(|m| {
        let raw = m.as_str();
        let body: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .skip(2)
            .map(ocr_digit)
            .collect();
        canonical_iban(&format!("TR{body}"))
    })
}

/// Map characters OCR commonly confuses with digits.
pub fn ocr_digit(c: char) -> char {
    match c {
        'O' | 'o' | 'D' => '0',
        'I' | 'l' | '|' => '1',
        'S' | 's' => '5',
        'B' => '8',
        'Z' | 'z' => '2',
        'G' => '6',
        other => other,
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Validate an IBAN using the checksum algorithm.
///
/// Algorithm:
/// 1. Move first 4 characters to the end
/// 2. Replace letters with numbers (A=10, B=11, ..., Z=35)
/// 3. The resulting number mod 97 should equal 1
pub fn validate_iban(iban: &str) -> bool {
    let iban: String = iban
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if iban.len() < 5 || !iban.is_ascii() {
        return false;
    }

    let (country_code, check_digits) = (&iban[..2], &iban[2..4]);
    if !country_code.chars().all(|c| c.is_ascii_alphabetic())
        || !check_digits.chars().all(|c| c.is_ascii_digit())
    {
        return false;
    }

    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);
    let mut remainder: u32 = 0;
    for c in rearranged.chars() {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            _ => return false,
        };
        // Letters expand to two digits.
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }

    remainder == 1
}

/// Format IBAN in groups of 4 characters.
pub fn format_iban(iban: &str) -> String {
    iban.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<Vec<char>>()
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(" ")
}
