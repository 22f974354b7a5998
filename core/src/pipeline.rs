// core/src/pipeline.rs
//
// The transliteration pipeline: a single-pass state machine per request.
//
//   Raw -> ExceptionsApplied -> Masked -> Normalized -> Unmasked
//       -> KanaMapped -> Diagnosed -> Done
//
// The normalizer is called exactly once per request, on the whole masked
// text, so cross-token phonological context is preserved and the external
// cost is bounded. Any fault inside the pipeline degrades to returning the
// original input unchanged; a request never observes a partial result.

use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::dict::SyllableDict;
use crate::error::Error;
use crate::exceptions::ExceptionTable;
use crate::mask;
use crate::normalizer::{NormalizeMode, Normalizer};
use crate::residue::{self, ResidueRecord};
use crate::token::{self, Token};
use crate::Config;

/// Per-request knobs.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Route the text through the external phonological normalizer. When
    /// off, Hangul tokens are mapped by spelling alone.
    pub use_normalizer: bool,
    /// Expose digit runs to the normalizer for phonetic reading instead of
    /// masking them.
    pub convert_numbers: bool,
    /// Include the phonetic Hangul intermediate in detail output.
    pub include_phonetic: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            use_normalizer: true,
            convert_numbers: false,
            include_phonetic: false,
        }
    }
}

/// Per-token breakdown for UI consumption.
#[derive(Debug, Clone, Serialize)]
pub struct TokenDetail {
    pub token: String,
    pub is_hangul: bool,
    pub converted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
}

/// Detail-preserving conversion result.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionDetail {
    pub original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub kana: String,
    pub tokens: Vec<TokenDetail>,
    pub residue: Vec<ResidueRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The converter service object: owns handles to the dictionary, exception
/// table and normalizer, constructed once and shared across requests.
#[derive(Clone)]
pub struct KanaConverter {
    dict: Arc<SyllableDict>,
    exceptions: Arc<ExceptionTable>,
    normalizer: Arc<dyn Normalizer>,
    mode: NormalizeMode,
}

impl KanaConverter {
    pub fn new(
        dict: Arc<SyllableDict>,
        exceptions: Arc<ExceptionTable>,
        normalizer: Arc<dyn Normalizer>,
        mode: NormalizeMode,
    ) -> Self {
        Self {
            dict,
            exceptions,
            normalizer,
            mode,
        }
    }

    /// Load resources named by `config` and build a converter around the
    /// given normalizer.
    pub fn from_config(config: &Config, normalizer: Arc<dyn Normalizer>) -> Result<Self, Error> {
        let dict = SyllableDict::load(&config.dict_path)?;
        let exceptions =
            ExceptionTable::load(&config.builtin_exceptions_path, &config.user_exceptions_path)?;
        Ok(Self::new(
            Arc::new(dict),
            Arc::new(exceptions),
            normalizer,
            config.normalize_mode(),
        ))
    }

    /// The exception table handle, for routing user additions.
    pub fn exceptions(&self) -> &Arc<ExceptionTable> {
        &self.exceptions
    }

    /// The syllable dictionary handle, for curation tooling.
    pub fn dict(&self) -> &Arc<SyllableDict> {
        &self.dict
    }

    /// Convert Korean text to kana. Never fails: any pipeline fault is
    /// swallowed and the original input comes back unchanged.
    pub fn convert(&self, text: &str, opts: &ConvertOptions) -> String {
        let result = if opts.use_normalizer {
            match self.run_stages(text, opts) {
                Ok(stages) => stages.kana,
                Err(err) => {
                    warn!(%err, "pipeline degraded to pass-through");
                    text.to_string()
                }
            }
        } else {
            self.direct_pass(&token::split(text))
        };
        self.warn_residue(&residue::scan(&result));
        debug!(input = text, output = %result, "converted");
        result
    }

    /// Convert with per-token detail and residue diagnostics attached.
    pub fn convert_with_details(&self, text: &str, opts: &ConvertOptions) -> ConversionDetail {
        let tokens = token::split(text);

        if !opts.use_normalizer {
            let details: Vec<TokenDetail> = tokens
                .iter()
                .map(|t| TokenDetail {
                    token: t.text.clone(),
                    is_hangul: t.is_hangul(),
                    converted: if t.is_hangul() {
                        self.dict.map_text(&t.text)
                    } else {
                        t.text.clone()
                    },
                    phonetic: None,
                })
                .collect();
            let kana: String = details.iter().map(|d| d.converted.as_str()).collect();
            let residue = residue::scan(&kana);
            self.warn_residue(&residue);
            return ConversionDetail {
                original: text.to_string(),
                phonetic: None,
                kana,
                tokens: details,
                residue,
                error: None,
            };
        }

        match self.run_stages(text, opts) {
            Ok(stages) => {
                let details = align_details(&tokens, &stages, opts.include_phonetic);
                let residue = residue::scan(&stages.kana);
                self.warn_residue(&residue);
                ConversionDetail {
                    original: text.to_string(),
                    phonetic: opts.include_phonetic.then(|| stages.phonetic.clone()),
                    kana: stages.kana,
                    tokens: details,
                    residue,
                    error: None,
                }
            }
            Err(err) => {
                warn!(%err, "pipeline degraded to pass-through");
                let details = tokens
                    .iter()
                    .map(|t| TokenDetail {
                        token: t.text.clone(),
                        is_hangul: t.is_hangul(),
                        converted: t.text.clone(),
                        phonetic: None,
                    })
                    .collect();
                ConversionDetail {
                    original: text.to_string(),
                    phonetic: None,
                    kana: text.to_string(),
                    tokens: details,
                    residue: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// The full-text path: exceptions -> mask -> one normalizer call ->
    /// unmask -> dictionary mapping. Returns both the unmasked phonetic
    /// intermediate and the final kana.
    fn run_stages(&self, text: &str, opts: &ConvertOptions) -> Result<Stages, Error> {
        if mask::contains_reserved(text) {
            return Err(Error::InvalidArgument(
                "input contains reserved placeholder codepoints".to_string(),
            ));
        }

        let with_exceptions = self.exceptions.apply(text);
        let tokens = token::split(&with_exceptions);
        let outcome = mask::mask(&tokens, !opts.convert_numbers);

        let normalized = self.normalizer.normalize(&outcome.masked, self.mode)?;
        // G2P engines are prone to mangling spacing; clean only when the
        // text actually changed so untouched input survives byte-for-byte.
        let cleaned = if normalized == outcome.masked {
            normalized
        } else {
            clean_normalized(&normalized)
        };

        let phonetic = mask::unmask(&cleaned, &outcome.placeholders);
        let kana = self.dict.map_text(&phonetic);
        Ok(Stages { phonetic, kana })
    }

    /// The normalizer-free path: map Hangul tokens by spelling, leave
    /// everything else untouched.
    fn direct_pass(&self, tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|t| {
                if t.is_hangul() {
                    self.dict.map_text(&t.text)
                } else {
                    t.text.clone()
                }
            })
            .collect()
    }

    fn warn_residue(&self, records: &[ResidueRecord]) {
        if !records.is_empty() {
            warn!(residue = %residue::format_ranked(records), "residual Hangul detected");
        }
    }
}

impl std::fmt::Debug for KanaConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KanaConverter")
            .field("dict_entries", &self.dict.len())
            .field("mode", &self.mode)
            .finish()
    }
}

struct Stages {
    phonetic: String,
    kana: String,
}

/// Collapse horizontal whitespace runs to one space and trim the ends of
/// each line. Line breaks are kept; the normalizer contract requires them
/// preserved and the cleanup must not undo that.
fn clean_normalized(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            line.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Index-align output and phonetic tokenizations with the input tokens.
///
/// The normalizer does not guarantee a stable token count, so alignment is
/// attempted and dropped rather than assumed: when counts mismatch, each
/// detail echoes its input token (and omits the phonetic) instead of
/// indexing out of bounds.
fn align_details(tokens: &[Token], stages: &Stages, include_phonetic: bool) -> Vec<TokenDetail> {
    let result_parts = token::split(&stages.kana);
    let phonetic_parts = token::split(&stages.phonetic);
    let results_aligned = result_parts.len() == tokens.len();
    let phonetic_aligned = phonetic_parts.len() == tokens.len();

    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let converted = if results_aligned {
                result_parts[i].text.clone()
            } else {
                t.text.clone()
            };
            let phonetic = (include_phonetic && t.is_hangul() && phonetic_aligned)
                .then(|| phonetic_parts[i].text.clone());
            TokenDetail {
                token: t.text.clone(),
                is_hangul: t.is_hangul(),
                converted,
                phonetic,
            }
        })
        .collect()
}
