//! Transaction status policy.
//!
//! One pass over normalized text, first match wins:
//! cancellation/failure, then pending, then the issuer's own completion
//! wording, else [`StatusOutcome::Unknown`]. There is no universal success
//! phrase; an issuer whose vocabulary is empty never reports `completed`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::StatusOutcome;

lazy_static! {
    static ref CANCELED: Regex = Regex::new(
        r"\b(?:iptal|iade edildi|cancel(?:l?ed)?)\b"
    ).unwrap();

    static ref FAILED: Regex = Regex::new(
        r"\b(?:basarisiz|reddedildi|failed|rejected)\b"
    ).unwrap();

    static ref PENDING: Regex = Regex::new(
        r"\b(?:beklemede|onay bekliyor|onayda|askida|isleniyor|pending|processing|awaiting approval)\b"
    ).unwrap();
}

/// Completion evidence for one issuer.
///
/// Each entry is a set of phrases that must all appear in the normalized
/// text; any satisfied entry proves completion. Phrases are written in
/// normalized form (lowercase, Turkish letters folded to ASCII).
#[derive(Debug, Clone, Copy)]
pub struct StatusVocabulary {
    completed: &'static [&'static [&'static str]],
}

impl StatusVocabulary {
    /// No completion wording: status stays `unknown` unless the receipt
    /// reports a failure or a pending state.
    pub const NONE: StatusVocabulary = StatusVocabulary { completed: &[] };

    pub const fn new(completed: &'static [&'static [&'static str]]) -> Self {
        Self { completed }
    }

    /// Whether this issuer can ever be reported as completed.
    pub fn has_completion(&self) -> bool {
        !self.completed.is_empty()
    }

    /// Whether `normalized` carries this issuer's completion wording.
    pub fn proves_completion(&self, normalized: &str) -> bool {
        self.completed
            .iter()
            .any(|all| !all.is_empty() && all.iter().all(|phrase| normalized.contains(phrase)))
    }
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self::NONE
    }
}

/// Classify a receipt's status from its normalized text.
pub fn classify_status(normalized: &str, vocabulary: &StatusVocabulary) -> StatusOutcome {
    if CANCELED.is_match(normalized) {
        return StatusOutcome::Canceled;
    }
    if FAILED.is_match(normalized) {
        return StatusOutcome::Failed;
    }
    if PENDING.is_match(normalized) {
        return StatusOutcome::Pending;
    }
    if vocabulary.proves_completion(normalized) {
        return StatusOutcome::Completed;
    }
    StatusOutcome::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;

    const ZIRAAT: StatusVocabulary = StatusVocabulary::new(&[
        &["islemi gerceklestirilmistir"],
        &["isleminiz gerceklestirilmistir"],
    ]);

    #[test]
    fn test_completion_phrase_required() {
        let text = normalize("FAST İşlemi Gerçekleştirilmiştir.");
        assert_eq!(classify_status(&text, &ZIRAAT), StatusOutcome::Completed);

        let text = normalize("FAST Dekontu");
        assert_eq!(classify_status(&text, &ZIRAAT), StatusOutcome::Unknown);
    }

    #[test]
    fn test_failure_outranks_completion() {
        let text = normalize("İşlemi gerçekleştirilmiştir. İşlem iptal edildi.");
        assert_eq!(classify_status(&text, &ZIRAAT), StatusOutcome::Canceled);

        let text = normalize("Transfer REJECTED by receiving bank");
        assert_eq!(classify_status(&text, &ZIRAAT), StatusOutcome::Failed);
    }

    #[test]
    fn test_pending_outranks_completion() {
        let text = normalize("İşlemi gerçekleştirilmiştir. Onay bekliyor");
        assert_eq!(classify_status(&text, &ZIRAAT), StatusOutcome::Pending);
    }

    #[test]
    fn test_empty_vocabulary_never_completes() {
        let text = normalize("İşleminiz gerçekleştirilmiştir. Dekont");
        assert!(!StatusVocabulary::NONE.has_completion());
        assert_eq!(classify_status(&text, &StatusVocabulary::NONE), StatusOutcome::Unknown);
    }

    #[test]
    fn test_all_phrases_of_an_entry_must_appear() {
        let vocab = StatusVocabulary::new(&[&["hesabinizdan", "cekilmistir"]]);
        assert_eq!(
            classify_status("tutar hesabinizdan cekilmistir", &vocab),
            StatusOutcome::Completed
        );
        assert_eq!(classify_status("tutar hesabinizdan", &vocab), StatusOutcome::Unknown);
    }

    #[test]
    fn test_words_inside_other_words_do_not_count() {
        assert_eq!(classify_status("iptaller sayfasi", &ZIRAAT), StatusOutcome::Unknown);
        assert_eq!(classify_status("iade talebi", &ZIRAAT), StatusOutcome::Unknown);
    }
}
