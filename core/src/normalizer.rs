// core/src/normalizer.rs
//
// Boundary to the external phonological normalizer (the G2P step that
// rewrites spelled Hangul toward pronunciation). Any concrete engine lives
// outside this crate behind the narrow `Normalizer` trait; the pipeline makes
// exactly one call per request and tolerates whatever comes back.

use crate::error::Error;

/// Normalization mode, mirroring the upstream G2P switch between actual
/// (descriptive) and standard (prescriptive) pronunciation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    Descriptive,
    Prescriptive,
}

impl Default for NormalizeMode {
    fn default() -> Self {
        NormalizeMode::Descriptive
    }
}

/// An opaque text -> text phonological normalizer.
///
/// Implementations may reshape token boundaries; the pipeline masks protected
/// spans before calling and realigns afterwards, so the only hard requirement
/// is that placeholder codepoints pass through untouched.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str, mode: NormalizeMode) -> Result<String, Error>;
}

/// Pass-through normalizer for offline use and environments without a G2P
/// engine; syllables are then mapped by spelling alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl Normalizer for IdentityNormalizer {
    fn normalize(&self, text: &str, _mode: NormalizeMode) -> Result<String, Error> {
        Ok(text.to_string())
    }
}
