//! kanafy-core
//!
//! Deterministic phonetic transliteration of Korean (Hangul) text into
//! approximate Japanese kana readings, for lyrics/subtitle localization
//! tooling.
//!
//! The pipeline applies curated exception spans, masks foreign words and
//! digits behind reversible placeholders, makes exactly one call to an
//! external phonological normalizer, unmasks, maps syllables through a
//! static dictionary and reports residual Hangul for curation.
//!
//! Public API:
//! - `KanaConverter` - the pipeline service object
//! - `SyllableDict` - precomposed syllable -> kana dictionary
//! - `ExceptionTable` - built-in + durable user override spans
//! - `Normalizer` - pluggable G2P boundary (`IdentityNormalizer` provided)
//! - `jamo` - syllable codec (decompose/compose/synthesize)
//! - `residue` - residual-Hangul diagnostics
//! - `curation` - offline candidate generation
//! - `Config` - resource paths and pipeline defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error;
pub use error::Error;

pub mod jamo;

pub mod dict;
pub use dict::SyllableDict;

pub mod exceptions;
pub use exceptions::ExceptionTable;

pub mod token;
pub use token::{Token, TokenKind};

pub mod mask;
pub use mask::MaskOutcome;

pub mod normalizer;
pub use normalizer::{IdentityNormalizer, NormalizeMode, Normalizer};

pub mod pipeline;
pub use pipeline::{ConversionDetail, ConvertOptions, KanaConverter, TokenDetail};

pub mod residue;
pub use residue::{ResidueCounter, ResidueRecord};

pub mod curation;
pub use curation::{Candidate, CandidateSource};

/// Resource locations and pipeline defaults, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Syllable dictionary JSON (one Hangul syllable -> kana), read-only at
    /// request time.
    pub dict_path: PathBuf,
    /// Built-in exception table JSON, immutable.
    pub builtin_exceptions_path: PathBuf,
    /// User exception table JSON, re-read before each addition and rewritten
    /// atomically on change.
    pub user_exceptions_path: PathBuf,
    /// Use descriptive (actual pronunciation) normalization rather than
    /// prescriptive.
    pub descriptive: bool,
    /// Default for exposing digit runs to phonetic conversion.
    pub convert_numbers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dict_path: PathBuf::from("resources/hangul_kana_dict.json"),
            builtin_exceptions_path: PathBuf::from("resources/kana_exceptions.json"),
            user_exceptions_path: PathBuf::from("resources/user_kana_exceptions.json"),
            descriptive: true,
            convert_numbers: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Error> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, Error> {
        toml::to_string_pretty(self).map_err(|e| Error::Parse(e.to_string()))
    }

    /// The normalizer mode implied by this configuration.
    pub fn normalize_mode(&self) -> NormalizeMode {
        if self.descriptive {
            NormalizeMode::Descriptive
        } else {
            NormalizeMode::Prescriptive
        }
    }

    /// Defaults for per-request options.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            use_normalizer: true,
            convert_numbers: self.convert_numbers,
            include_phonetic: false,
        }
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
