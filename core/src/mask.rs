// core/src/mask.rs
//
// Masking protocol: shields foreign words and (optionally) digit runs from
// the external phonological normalizer by swapping them for reversible
// placeholders before the call and restoring them afterwards.
//
// Placeholders are three codepoints from the private use area:
// sentinel, per-token index, sentinel. The reserved range must never appear
// in legitimate input or normalizer output; `contains_reserved` lets the
// pipeline refuse such input up front.

use crate::token::{Token, TokenKind};

/// Sentinel codepoint bracketing every placeholder.
const SENTINEL: char = '\u{E000}';
/// Base codepoint for per-token indices; token n gets `INDEX_BASE + n`.
const INDEX_BASE: u32 = 0xE100;
/// End of the reserved range (inclusive). Bounds the number of maskable
/// tokens per run; beyond it tokens are left unmasked.
const RESERVED_LAST: u32 = 0xF8FF;

/// Result of masking one pipeline run: the masked text plus the
/// (placeholder, original) substitutions needed to reverse it. Placeholder
/// assignments live only for the duration of the run.
#[derive(Debug, Clone, Default)]
pub struct MaskOutcome {
    pub masked: String,
    pub placeholders: Vec<(String, String)>,
}

/// True if `text` touches the reserved private-use range. Such input is
/// unsupported: masking it could collide with live placeholders.
pub fn contains_reserved(text: &str) -> bool {
    text.chars()
        .any(|ch| (SENTINEL as u32..=RESERVED_LAST).contains(&(ch as u32)))
}

fn needs_mask(token: &Token, protect_digits: bool) -> bool {
    if token.kind != TokenKind::Alnum {
        return false;
    }
    if token.text.chars().any(|ch| ch.is_ascii_alphabetic()) {
        return true;
    }
    protect_digits && token.text.chars().all(|ch| ch.is_ascii_digit())
}

/// Replace protected tokens with fresh placeholders, preserving order.
///
/// A token is masked iff it is alnum and contains a Latin letter, or it is
/// purely numeric and `protect_digits` is set.
pub fn mask(tokens: &[Token], protect_digits: bool) -> MaskOutcome {
    let mut out = MaskOutcome::default();
    for token in tokens {
        if needs_mask(token, protect_digits) {
            let index = INDEX_BASE + out.placeholders.len() as u32;
            if let Some(index_ch) = char::from_u32(index).filter(|_| index <= RESERVED_LAST) {
                let placeholder: String = [SENTINEL, index_ch, SENTINEL].iter().collect();
                out.masked.push_str(&placeholder);
                out.placeholders.push((placeholder, token.text.clone()));
                continue;
            }
        }
        out.masked.push_str(&token.text);
    }
    out
}

/// Restore masked spans by literal placeholder substitution. Idempotent:
/// once a placeholder is gone, re-applying is a no-op.
pub fn unmask(text: &str, placeholders: &[(String, String)]) -> String {
    let mut out = text.to_string();
    for (placeholder, original) in placeholders {
        out = out.replace(placeholder, original);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::split;

    #[test]
    fn mask_roundtrip_restores_input() {
        let text = "Let's go! 라는 노래야 2024";
        let tokens = split(text);
        let outcome = mask(&tokens, true);
        assert_ne!(outcome.masked, text);
        assert_eq!(unmask(&outcome.masked, &outcome.placeholders), text);
    }

    #[test]
    fn latin_tokens_always_masked_digits_only_when_protected() {
        let tokens = split("abc 123 한");
        let protected = mask(&tokens, true);
        assert_eq!(protected.placeholders.len(), 2);

        let unprotected = mask(&tokens, false);
        assert_eq!(unprotected.placeholders.len(), 1);
        assert!(unprotected.masked.contains("123"));
        assert!(!unprotected.masked.contains("abc"));
    }

    #[test]
    fn hangul_and_symbols_never_masked() {
        let tokens = split("한글?! ...");
        let outcome = mask(&tokens, true);
        assert!(outcome.placeholders.is_empty());
        assert_eq!(outcome.masked, "한글?! ...");
    }

    #[test]
    fn placeholders_are_three_codepoints() {
        let tokens = split("word");
        let outcome = mask(&tokens, false);
        assert_eq!(outcome.placeholders.len(), 1);
        assert_eq!(outcome.placeholders[0].0.chars().count(), 3);
    }

    #[test]
    fn unmask_is_idempotent() {
        let tokens = split("abc 한");
        let outcome = mask(&tokens, false);
        let once = unmask(&outcome.masked, &outcome.placeholders);
        let twice = unmask(&once, &outcome.placeholders);
        assert_eq!(once, twice);
    }

    #[test]
    fn reserved_range_detection() {
        assert!(contains_reserved("a\u{E000}b"));
        assert!(contains_reserved("\u{E105}"));
        assert!(!contains_reserved("한글 abc 123"));
    }
}
