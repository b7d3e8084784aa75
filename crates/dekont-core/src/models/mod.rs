//! Data models: configuration, issuers and output records.

pub mod config;
pub mod issuer;
pub mod record;

pub use config::{ClassifierConfig, DekontConfig, OcrConfig, OcrEngineKind, PdfConfig};
pub use issuer::Issuer;
pub use record::{Classification, DetectionMethod, FieldRecord, StatusOutcome};
