// core/src/curation.rs
//
// Offline candidate generation for dictionary curation: for each unresolved
// syllable, propose a kana reading and tag where it came from. Consumed by
// the tools crate, never by the request-time pipeline.
//
// Ladder per syllable:
//   1. exact       - the syllable is already in the dictionary
//   2. phonetic_dict - normalizer output maps fully through the dictionary
//   3. jamo_dict   - coda-free dictionary base + coda trail
//   4. jamo_synth  - total codec synthesis
//   5. no_rule     - nothing applied (out-of-range indices only)

use ahash::AHashMap;
use serde::Serialize;

use crate::dict::SyllableDict;
use crate::jamo;
use crate::normalizer::{NormalizeMode, Normalizer};
use crate::residue;

/// Provenance of a generated candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Exact,
    PhoneticDict,
    JamoDict,
    JamoSynth,
    NoRule,
    NotHangul,
}

/// One proposed dictionary entry, annotated for human review.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub syllable: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jamo: Option<String>,
    pub kana: Option<String>,
    pub source: CandidateSource,
    pub note: String,
}

/// (onset, vowel) -> kana from the dictionary's coda-free entries. Readings
/// curated by hand beat synthesized ones, so coda variants reuse them.
pub fn base_table(dict: &SyllableDict) -> AHashMap<(usize, usize), String> {
    let mut base = AHashMap::new();
    for (syllable, kana) in dict.entries() {
        if kana.is_empty() {
            continue;
        }
        if let Some((onset, vowel, 0)) = jamo::decompose(syllable) {
            base.insert((onset, vowel), kana.to_string());
        }
    }
    base
}

/// Generate candidates for a batch of unresolved syllables.
pub fn generate(
    syllables: &[char],
    dict: &SyllableDict,
    normalizer: Option<&dyn Normalizer>,
) -> Vec<Candidate> {
    let base = base_table(dict);
    syllables
        .iter()
        .map(|&syllable| generate_one(syllable, dict, normalizer, &base))
        .collect()
}

fn generate_one(
    syllable: char,
    dict: &SyllableDict,
    normalizer: Option<&dyn Normalizer>,
    base: &AHashMap<(usize, usize), String>,
) -> Candidate {
    if !jamo::is_syllable(syllable) {
        return Candidate {
            syllable,
            phonetic: None,
            jamo: None,
            kana: None,
            source: CandidateSource::NotHangul,
            note: "not a precomposed Hangul syllable".to_string(),
        };
    }

    if let Some(kana) = dict.lookup(syllable) {
        return Candidate {
            syllable,
            phonetic: None,
            jamo: None,
            kana: Some(kana.to_string()),
            source: CandidateSource::Exact,
            note: "already in the dictionary".to_string(),
        };
    }

    // Phonetic route: normalize, then map; accept only a clean mapping.
    let mut phonetic = None;
    if let Some(normalizer) = normalizer {
        match normalizer.normalize(&syllable.to_string(), NormalizeMode::Descriptive) {
            Ok(ph) => {
                let mapped = dict.map_text(&ph);
                if residue::scan(&mapped).is_empty() {
                    return Candidate {
                        syllable,
                        phonetic: Some(ph.clone()),
                        jamo: None,
                        kana: Some(mapped),
                        source: CandidateSource::PhoneticDict,
                        note: format!("normalized to {} and fully mapped", ph),
                    };
                }
                phonetic = Some(ph);
            }
            Err(err) => {
                phonetic = None;
                tracing::warn!(%syllable, %err, "normalizer failed during candidate generation");
            }
        }
    }

    // Codec routes. decompose cannot fail here, the syllable check passed.
    let Some((onset, vowel, coda)) = jamo::decompose(syllable) else {
        return Candidate {
            syllable,
            phonetic,
            jamo: None,
            kana: None,
            source: CandidateSource::NotHangul,
            note: "decomposition failed".to_string(),
        };
    };
    let (o, v, c) = jamo::jamo_names(onset, vowel, coda);
    let jamo_str = match c {
        Some(c) => format!("{}+{}+{}", o, v, c),
        None => format!("{}+{}", o, v),
    };

    if let Some(base_kana) = base.get(&(onset, vowel)) {
        return Candidate {
            syllable,
            phonetic,
            jamo: Some(jamo_str),
            kana: Some(format!("{}{}", base_kana, jamo::coda_trail(coda))),
            source: CandidateSource::JamoDict,
            note: "dictionary base + coda trail".to_string(),
        };
    }

    match jamo::synthesize(onset, vowel, coda) {
        Some(kana) => Candidate {
            syllable,
            phonetic,
            jamo: Some(jamo_str),
            kana: Some(kana),
            source: CandidateSource::JamoSynth,
            note: "codec synthesis".to_string(),
        },
        // Unreachable for in-range indices; a hit here means a defect in
        // the static tables.
        None => Candidate {
            syllable,
            phonetic,
            jamo: Some(jamo_str),
            kana: None,
            source: CandidateSource::NoRule,
            note: format!("no synthesis rule for ({},{},{})", onset, vowel, coda),
        },
    }
}
