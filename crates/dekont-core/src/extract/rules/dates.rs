//! Transaction date/time extraction.
//!
//! Output is always `DD.MM.YYYY HH:MM` or `DD.MM.YYYY HH:MM:SS`; a layout
//! that prints no time yields `DD.MM.YYYY`. Dates are validated with chrono
//! so OCR garbage such as `41.13.2026` is dropped instead of reported.

use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};

use super::patterns::{DATE_ONLY, DATE_TIME, DATE_TIME_ISO, TIME_ONLY};
use super::{ExtractionMatch, FieldExtractor};

/// A validated receipt timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub has_seconds: bool,
}

impl Timestamp {
    /// Canonical `DD.MM.YYYY HH:MM[:SS]` form.
    pub fn format(&self) -> String {
        let date = self.date.format("%d.%m.%Y");
        match self.time {
            Some(time) if self.has_seconds => format!("{} {}", date, time.format("%H:%M:%S")),
            Some(time) => format!("{} {}", date, time.format("%H:%M")),
            None => date.to_string(),
        }
    }
}

/// Datetime field extractor.
pub struct DateTimeExtractor;

impl DateTimeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateTimeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateTimeExtractor {
    type Output = ExtractionMatch<Timestamp>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in DATE_TIME.captures_iter(text) {
            let full = &caps[0];
            if let Some(ts) = timestamp_from_dmy(&caps) {
                let m = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or_default();
                results.push(ExtractionMatch::new(ts, 0.9, full).with_position(m.0, m.1));
            }
        }

        for caps in DATE_TIME_ISO.captures_iter(text) {
            let date = ymd(&caps[1], &caps[2], &caps[3]);
            let time = hms(&caps[4], &caps[5], caps.get(6).map(|m| m.as_str()));
            if let (Some(date), Some((time, has_seconds))) = (date, time) {
                let ts = Timestamp { date, time: Some(time), has_seconds };
                let m = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or_default();
                results.push(ExtractionMatch::new(ts, 0.85, &caps[0]).with_position(m.0, m.1));
            }
        }

        results.sort_by_key(|r| r.position.map(|(s, _)| s).unwrap_or(usize::MAX));
        results
    }
}

fn squeeze(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        squeeze(year).parse().ok()?,
        squeeze(month).parse().ok()?,
        squeeze(day).parse().ok()?,
    )
}

fn hms(hour: &str, minute: &str, second: Option<&str>) -> Option<(NaiveTime, bool)> {
    let h = squeeze(hour).parse().ok()?;
    let m = squeeze(minute).parse().ok()?;
    match second {
        Some(s) => NaiveTime::from_hms_opt(h, m, squeeze(s).parse().ok()?).map(|t| (t, true)),
        None => NaiveTime::from_hms_opt(h, m, 0).map(|t| (t, false)),
    }
}

fn timestamp_from_dmy(caps: &Captures<'_>) -> Option<Timestamp> {
    let date = ymd(&caps[3], &caps[2], &caps[1])?;
    let (time, has_seconds) = hms(&caps[4], &caps[5], caps.get(6).map(|m| m.as_str()))?;
    Some(Timestamp {
        date,
        time: Some(time),
        has_seconds,
    })
}

/// First date+time anywhere in `text`, canonicalized.
pub fn extract_datetime(text: &str) -> Option<String> {
    DateTimeExtractor::new().extract(text).map(|m| m.value.format())
}

/// First date+time after a label, within `window` bytes.
pub fn datetime_after(text: &str, label: &Regex, window: usize) -> Option<String> {
    let m = label.find(text)?;
    let mut end = (m.end() + window).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    extract_datetime(&text[m.end()..end])
}

/// Canonicalize a captured `date time` string; tolerant of any separator.
pub fn normalize_datetime(raw: &str) -> Option<String> {
    extract_datetime(raw)
}

/// Date-only fallback, `DD.MM.YYYY`.
pub fn extract_date(text: &str) -> Option<String> {
    DATE_ONLY.captures_iter(text).find_map(|caps| {
        let date = ymd(&caps[3], &caps[2], &caps[1])?;
        Some(Timestamp { date, time: None, has_seconds: false }.format())
    })
}

/// Combine the first date and the first time of day found anywhere.
///
/// For layouts that print date and time in separate cells.
pub fn first_date_and_time(text: &str) -> Option<String> {
    let date_caps = DATE_ONLY.captures(text)?;
    let date = ymd(&date_caps[3], &date_caps[2], &date_caps[1])?;
    let date_end = date_caps.get(0).map(|m| m.end()).unwrap_or(0);

    let time = TIME_ONLY
        .captures_iter(&text[date_end..])
        .chain(TIME_ONLY.captures_iter(text))
        .find_map(|caps| hms(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str())));

    let (time, has_seconds) = match time {
        Some((t, s)) => (Some(t), s),
        None => (None, false),
    };
    Some(Timestamp { date, time, has_seconds }.format())
}
