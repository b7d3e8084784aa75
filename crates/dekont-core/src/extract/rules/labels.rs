//! Label-anchored value lookup.
//!
//! A value is the text right after a label on the same line (after any
//! `:`/`-` separator) or, when the label ends its line, the next non-blank
//! line. Values are cut at the next label the caller knows about so a
//! two-column line such as `ALICI: X  ALICI IBAN: TR..` yields only `X`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::{collapse_whitespace, normalize};

lazy_static! {
    static ref LEADING_SEPARATORS: Regex = Regex::new(r"^[\s:;\-–—=]+").unwrap();
}

/// Trim and collapse a captured value; empty becomes `None`.
pub fn clean_value(raw: &str) -> Option<String> {
    let value = collapse_whitespace(raw);
    let value = value.trim_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Group 1 of the first match, cleaned.
pub fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| clean_value(m.as_str()))
}

/// Group 1 of every match, cleaned, in order.
pub fn capture_all(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1).and_then(|m| clean_value(m.as_str())))
        .collect()
}

fn cut_at(value: &str, stop: Option<&Regex>) -> Option<String> {
    let end = stop
        .and_then(|stop| stop.find(value))
        .map(|m| m.start())
        .unwrap_or(value.len());
    clean_value(&value[..end])
}

/// Value on the label's own line, cut at `stop`.
pub fn inline_value(text: &str, label: &Regex, stop: Option<&Regex>) -> Option<String> {
    let m = label.find(text)?;
    let line = text[m.end()..].lines().next().unwrap_or("");
    let line = LEADING_SEPARATORS.replace(line, "");
    cut_at(&line, stop)
}

/// First non-blank line after the label's line.
pub fn next_line_value(text: &str, label: &Regex, stop: Option<&Regex>) -> Option<String> {
    let m = label.find(text)?;
    let line = text[m.end()..]
        .lines()
        .skip(1)
        .find(|l| !l.trim().is_empty())?;
    let line = LEADING_SEPARATORS.replace(line, "");
    cut_at(&line, stop)
}

/// Same-line value, else the next non-blank line.
pub fn value_after(text: &str, label: &Regex, stop: Option<&Regex>) -> Option<String> {
    inline_value(text, label, stop).or_else(|| next_line_value(text, label, stop))
}

/// Value after every occurrence of a label, in document order.
pub fn values_after(text: &str, label: &Regex, stop: Option<&Regex>) -> Vec<String> {
    label
        .find_iter(text)
        .filter_map(|m| value_after(&text[m.start()..], label, stop))
        .collect()
}

/// The line following a line that reads exactly `label` (case-insensitive).
pub fn line_after_exact(text: &str, label: &str) -> Option<String> {
    let mut lines = text.lines().map(str::trim);
    while let Some(line) = lines.next() {
        if line.to_lowercase() == label.to_lowercase() {
            return lines.find(|l| !l.is_empty()).and_then(clean_value);
        }
    }
    None
}

/// Up to `len` bytes of `text` starting at `start`, cut on a char boundary.
pub fn window(text: &str, start: usize, len: usize) -> &str {
    let start = start.min(text.len());
    let mut end = start.saturating_add(len).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.get(start..end).unwrap_or("")
}

/// Value of a `Label : value` row among `lines`.
///
/// Labels are compared in normalized form. A row that is exactly the label
/// yields the next line; a row starting with it yields the text after its
/// first `:` separator, or the whole row when it has none.
pub fn row_value(lines: &[&str], label: &str) -> Option<String> {
    let label = normalize(label);
    lines.iter().enumerate().find_map(|(i, line)| {
        let row = normalize(line);
        if row == label {
            return lines.get(i + 1).and_then(|next| clean_value(next));
        }
        if !row.starts_with(&label) {
            return None;
        }
        match separator(line) {
            Some(idx) => clean_value(&line[idx + 1..]),
            None => clean_value(line),
        }
    })
}

/// First `:` that is not part of a clock time.
fn separator(line: &str) -> Option<usize> {
    line.char_indices()
        .find(|&(i, c)| c == ':' && !line[..i].ends_with(|p: char| p.is_ascii_digit()))
        .map(|(i, _)| i)
}

/// Non-blank lines, trimmed.
pub fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}
