// core/src/token.rs
//
// Token classifier: splits text into maximal runs of one class
// {Hangul, alnum, other symbol, whitespace}. Tokens partition the input
// contiguously and completely; each whitespace codepoint is its own token so
// spacing survives per-token reassembly unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leftmost-first alternation: Hangul run, alnum run (apostrophes included so
/// contractions like "Let's" stay one token), a single whitespace codepoint,
/// then any other non-space symbol run.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[가-힣]+|[A-Za-z0-9'’]+|\s|[^\s가-힣A-Za-z0-9]+").expect("token pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Hangul,
    Alnum,
    Other,
    Whitespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn is_hangul(&self) -> bool {
        self.kind == TokenKind::Hangul
    }
}

fn classify(text: &str) -> TokenKind {
    match text.chars().next() {
        Some(ch) if ('가'..='힣').contains(&ch) => TokenKind::Hangul,
        Some(ch) if ch.is_whitespace() => TokenKind::Whitespace,
        Some(ch) if ch.is_ascii_alphanumeric() || ch == '\'' || ch == '’' => TokenKind::Alnum,
        _ => TokenKind::Other,
    }
}

/// Split text into classified tokens covering 100% of the input.
pub fn split(text: &str) -> Vec<Token> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str().to_string(),
            kind: classify(m.as_str()),
        })
        .collect()
}

/// True if `text` is non-empty and consists solely of precomposed Hangul
/// syllables.
pub fn is_hangul(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|ch| ('가'..='힣').contains(&ch))
}
