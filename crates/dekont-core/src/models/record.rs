//! Canonical output records: classification result, field record and status.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::issuer::Issuer;

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Matched on the embedded text layer.
    Text,
    /// Matched on OCR output.
    Ocr,
    /// Nothing matched.
    None,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Ocr => "ocr",
            Self::None => "none",
        })
    }
}

/// Result of the detector chain. Exactly one per document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Stable registry key, e.g. `ZIRAAT_FAST`.
    pub key: String,
    /// Human-readable issuer name.
    pub bank: String,
    /// Layout sub-variant, if the issuer has several.
    pub variant: Option<String>,
    /// Where the match came from.
    pub method: DetectionMethod,
}

impl Classification {
    pub const UNKNOWN_KEY: &'static str = "UNKNOWN";

    pub fn new(
        key: impl Into<String>,
        issuer: Issuer,
        variant: Option<&str>,
        method: DetectionMethod,
    ) -> Self {
        Self {
            key: key.into(),
            bank: issuer.name().to_string(),
            variant: variant.map(str::to_string),
            method,
        }
    }

    /// The explicit "nothing matched" result.
    pub fn unknown() -> Self {
        Self {
            key: Self::UNKNOWN_KEY.to_string(),
            bank: "Unknown".to_string(),
            variant: None,
            method: DetectionMethod::None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.key == Self::UNKNOWN_KEY
    }
}

/// Transaction outcome derived from receipt wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusOutcome {
    Completed,
    Pending,
    Canceled,
    Failed,
    #[default]
    Unknown,
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        })
    }
}

/// Canonical field record produced by every extractor.
///
/// Every field is optional. Extractors leave a field empty rather than
/// guessing. `extras` carries issuer-specific fields (`sira_no`, `fis_no`)
/// and is flattened into the serialized record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub tr_status: StatusOutcome,
    pub sender_name: Option<String>,
    pub sender_iban: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_iban: Option<String>,
    pub amount: Option<String>,
    pub transaction_time: Option<String>,
    pub receipt_no: Option<String>,
    pub transaction_ref: Option<String>,

    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldRecord {
    pub const SIRA_NO: &'static str = "sira_no";
    pub const FIS_NO: &'static str = "fis_no";

    /// A null-field record carrying an explanation.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Set an extension field if a value was found.
    pub fn with_extra(mut self, name: &str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.extras.insert(name.to_string(), value);
        }
        self
    }

    pub fn extra(&self, name: &str) -> Option<&str> {
        self.extras.get(name).map(String::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Number of populated canonical fields, status excluded.
    pub fn filled_fields(&self) -> usize {
        [
            &self.sender_name,
            &self.sender_iban,
            &self.receiver_name,
            &self.receiver_iban,
            &self.amount,
            &self.transaction_time,
            &self.receipt_no,
            &self.transaction_ref,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}
