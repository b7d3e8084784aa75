//! Text normalization shared by the classifier, extractors and status policy.
//!
//! [`normalize`] produces the matching form of a text: case-folded, Turkish
//! letters transliterated to ASCII, invisible and bidirectional marks removed
//! and whitespace collapsed. Digits and punctuation are never touched so that
//! amounts, dates and IBANs survive.

/// Combining dot above, left behind when `İ` is lowercased.
const COMBINING_DOT_ABOVE: char = '\u{0307}';

/// Directional and zero-width marks that PDF text layers (notably Arabic
/// templates) scatter through otherwise plain text.
pub fn is_invisible_mark(c: char) -> bool {
    matches!(
        c,
        '\u{200b}'..='\u{200f}' | '\u{202a}'..='\u{202e}' | '\u{2066}'..='\u{2069}' | '\u{feff}'
    )
}

fn fold_turkish(c: char) -> char {
    match c {
        'ı' | 'İ' => 'i',
        'ö' | 'Ö' => 'o',
        'ü' | 'Ü' => 'u',
        'ş' | 'Ş' => 's',
        'ğ' | 'Ğ' => 'g',
        'ç' | 'Ç' => 'c',
        'â' | 'Â' => 'a',
        'î' | 'Î' => 'i',
        'û' | 'Û' => 'u',
        other => other,
    }
}

/// Normalize text for matching. Idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c == COMBINING_DOT_ABOVE || is_invisible_mark(c) {
            continue;
        }
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(fold_turkish(c));
    }

    out
}

/// Remove invisible and bidirectional marks, keeping everything else as is.
pub fn strip_invisible(text: &str) -> String {
    text.chars().filter(|c| !is_invisible_mark(*c)).collect()
}

/// ASCII-fold Turkish letters and uppercase, keeping line structure.
///
/// Used by layouts whose labels are matched in upper case regardless of the
/// diacritics the text layer produced.
pub fn fold_upper(text: &str) -> String {
    text.chars()
        .filter(|c| *c != COMBINING_DOT_ABOVE && !is_invisible_mark(*c))
        .map(fold_turkish)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_turkish_letters_are_folded() {
        assert_eq!(normalize("İŞLEM TUTARI"), "islem tutari");
        assert_eq!(normalize("Alıcı Adı Soyadı"), "alici adi soyadi");
        assert_eq!(normalize("GÖNDEREN ÇAĞRI ÜNAL"), "gonderen cagri unal");
    }

    #[test]
    fn test_combining_dot_is_removed() {
        assert_eq!(normalize("i\u{0307}ptal"), "iptal");
    }

    #[test]
    fn test_bidi_marks_are_removed() {
        assert_eq!(normalize("\u{200f}المبلغ\u{200e} 100"), "المبلغ 100");
        assert_eq!(normalize("\u{feff}ZIRAAT\u{2066}BANK\u{2069}"), "ziraatbank");
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(normalize("  a\n\n b\t\u{00a0}c  "), "a b c");
        assert_eq!(normalize("a \u{200b} b"), "a b");
    }

    #[test]
    fn test_digits_and_punctuation_survive() {
        assert_eq!(
            normalize("TR12 0001 / 1.250,00 TL - 31/01/2026"),
            "tr12 0001 / 1.250,00 tl - 31/01/2026"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "İSTANBUL ŞUBESİ\n  Işık",
            "\u{202b}إيصال\u{202c}  Kuveyt Türk",
            "Σ ΣΑΣ end",
            "  \u{200d} ",
            "ÂLEM  Î  Û",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_fold_upper_keeps_lines() {
        assert_eq!(fold_upper("Gönderen\nAlıcı"), "GONDEREN\nALICI");
    }
}
