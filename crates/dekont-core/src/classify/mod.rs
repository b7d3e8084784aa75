//! Issuer and variant classification.
//!
//! Stages run in a fixed order: domain rules on the text layer, legal-name
//! rules on the text layer, then the OCR allow-list on page 1. The first
//! matching rule fixes the issuer; a second pass then refines the variant
//! for issuers with several layouts.

pub mod rules;
pub mod variants;

pub use rules::{rules, stage_rules, Predicate, Rule, Stage};
pub use variants::{refine, Refinement};

use std::time::Instant;

use tracing::{debug, info};

use crate::document::Document;
use crate::models::{Classification, ClassifierConfig, DetectionMethod, OcrConfig};

/// Detector chain over the static rule table.
#[derive(Debug, Clone)]
pub struct Classifier {
    name_fallback: bool,
    ocr_window: usize,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            name_fallback: ClassifierConfig::default().name_fallback,
            ocr_window: OcrConfig::default().window_chars,
        }
    }

    pub fn from_config(classifier: &ClassifierConfig, ocr: &OcrConfig) -> Self {
        Self {
            name_fallback: classifier.name_fallback,
            ocr_window: ocr.window_chars,
        }
    }

    /// Enable or disable the legal-name stage.
    pub fn with_name_fallback(mut self, enabled: bool) -> Self {
        self.name_fallback = enabled;
        self
    }

    /// Number of leading OCR characters the OCR stage looks at.
    pub fn with_ocr_window(mut self, chars: usize) -> Self {
        self.ocr_window = chars;
        self
    }

    /// Classify a document. Always returns exactly one result.
    pub fn classify(&self, document: &Document) -> Classification {
        let start = Instant::now();

        let result = self
            .classify_text(document.normalized_text())
            .or_else(|| self.classify_ocr(document))
            .unwrap_or_else(Classification::unknown);

        info!(
            "Classified as {} via {} in {:?}",
            result.key,
            result.method,
            start.elapsed()
        );
        result
    }

    /// Text-layer stages only, over already normalized text.
    pub fn classify_text(&self, normalized: &str) -> Option<Classification> {
        if normalized.is_empty() {
            return None;
        }

        let hit = stage_rules(Stage::Text)
            .find(|rule| rule.matches(normalized))
            .or_else(|| {
                if self.name_fallback {
                    stage_rules(Stage::Name).find(|rule| rule.matches(normalized))
                } else {
                    None
                }
            })?;

        Some(resolve(hit, normalized, DetectionMethod::Text))
    }

    fn classify_ocr(&self, document: &Document) -> Option<Classification> {
        if !document.ocr_available() {
            return None;
        }

        let ocr = document.ocr_normalized_text();
        let window = leading_chars(ocr, self.ocr_window);
        if window.is_empty() {
            debug!("OCR produced no text; skipping OCR stage");
            return None;
        }

        let hit = stage_rules(Stage::Ocr).find(|rule| rule.matches(window))?;
        Some(resolve(hit, window, DetectionMethod::Ocr))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(rule: &Rule, normalized: &str, method: DetectionMethod) -> Classification {
    debug!("Rule {} ({}) matched: {}", rule.key, rule.stage.as_str(), rule.describe());

    if rule.variant.is_none() {
        if let Some(refined) = refine(rule.issuer, normalized) {
            debug!("Variant refined {} -> {}", rule.key, refined.key);
            return Classification::new(refined.key, rule.issuer, Some(refined.variant), method);
        }
    }
    Classification::new(rule.key, rule.issuer, rule.variant, method)
}

fn leading_chars(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Classify with the default classifier.
pub fn classify(document: &Document) -> Classification {
    Classifier::new().classify(document)
}
