// core/src/dict.rs
//
// Static syllable dictionary: one precomposed Hangul syllable -> kana string.
// Loaded once at startup from a human-editable UTF-8 JSON object and shared
// read-only afterwards. Absent entries pass through unchanged at request
// time; synthesis for unknown syllables happens only in offline curation.

use ahash::AHashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Error;
use crate::jamo;

#[derive(Debug, Clone, Default)]
pub struct SyllableDict {
    map: AHashMap<char, String>,
}

impl SyllableDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from (syllable, kana) pairs. Non-syllable keys are
    /// skipped with a warning, matching the file loader.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = AHashMap::new();
        for (key, kana) in pairs {
            let key = key.as_ref();
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if jamo::is_syllable(ch) => {
                    map.insert(ch, kana.into());
                }
                _ => {
                    warn!(key, "skipping syllable dictionary entry: key is not one Hangul syllable");
                }
            }
        }
        Self { map }
    }

    /// Load the dictionary from a JSON object file (syllable -> kana).
    ///
    /// A missing file yields an empty dictionary, so a fresh deployment can
    /// run (everything passes through) while the resource is provisioned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "syllable dictionary not found, starting empty");
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)?;
        let dict = Self::from_pairs(
            raw.into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string()))),
        );
        info!(path = %path.display(), entries = dict.len(), "loaded syllable dictionary");
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn lookup(&self, ch: char) -> Option<&str> {
        self.map.get(&ch).map(String::as_str)
    }

    /// Iterate all entries; arbitrary order. Used by curation tooling.
    pub fn entries(&self) -> impl Iterator<Item = (char, &str)> {
        self.map.iter().map(|(&ch, kana)| (ch, kana.as_str()))
    }

    /// Map every codepoint through the dictionary, identity on miss.
    pub fn map_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2);
        for ch in text.chars() {
            match self.lookup(ch) {
                Some(kana) => out.push_str(kana),
                None => out.push(ch),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_text_passes_through_on_miss() {
        let dict = SyllableDict::from_pairs([("한", "ハン"), ("글", "グル")]);
        assert_eq!(dict.map_text("한글 test 한?"), "ハングル test ハン?");
    }

    #[test]
    fn from_pairs_skips_invalid_keys() {
        let dict = SyllableDict::from_pairs([("한", "ハン"), ("한글", "x"), ("a", "x"), ("", "x")]);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.lookup('한'), Some("ハン"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dict = SyllableDict::load("/nonexistent/kana_dict.json").unwrap();
        assert!(dict.is_empty());
    }
}
