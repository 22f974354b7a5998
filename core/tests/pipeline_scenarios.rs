// core/tests/pipeline_scenarios.rs
//
// End-to-end pipeline scenarios:
// - full conversion leaves no residual Hangul for covered syllables
// - non-Hangul text passes through byte-for-byte
// - foreign words survive the normalizer untouched
// - digit handling follows convert_numbers
// - normalizer faults degrade to the original input

use std::sync::{Arc, Mutex};

use kanafy_core::{
    jamo, ConvertOptions, Error, ExceptionTable, IdentityNormalizer, KanaConverter, NormalizeMode,
    Normalizer, SyllableDict,
};

/// Records every text the pipeline hands to the normalizer.
#[derive(Default)]
struct RecordingNormalizer {
    seen: Mutex<Vec<String>>,
}

impl Normalizer for RecordingNormalizer {
    fn normalize(&self, text: &str, _mode: NormalizeMode) -> Result<String, Error> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(text.to_string())
    }
}

struct FailingNormalizer;

impl Normalizer for FailingNormalizer {
    fn normalize(&self, _text: &str, _mode: NormalizeMode) -> Result<String, Error> {
        Err(Error::NormalizerFailure("engine unavailable".to_string()))
    }
}

/// Dictionary backed by codec synthesis, covering every syllable under test.
fn synthesized_dict(syllables: &str) -> SyllableDict {
    SyllableDict::from_pairs(syllables.chars().map(|ch| {
        let (o, v, c) = jamo::decompose(ch).expect("test syllable");
        (ch.to_string(), jamo::synthesize(o, v, c).expect("synthesis"))
    }))
}

fn converter_with(dict: SyllableDict, normalizer: Arc<dyn Normalizer>) -> (KanaConverter, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let exceptions = ExceptionTable::new(Vec::new(), dir.path().join("user_exceptions.json"));
    let converter = KanaConverter::new(
        Arc::new(dict),
        Arc::new(exceptions),
        normalizer,
        NormalizeMode::Descriptive,
    );
    (converter, dir)
}

#[test]
fn covered_hangul_converts_without_residue() {
    let (converter, _dir) = converter_with(synthesized_dict("한글"), Arc::new(IdentityNormalizer));
    let out = converter.convert("한글", &ConvertOptions::default());
    assert_eq!(out, "ハングル");
    assert!(kanafy_core::residue::scan(&out).is_empty());
}

#[test]
fn text_without_hangul_passes_through_exactly() {
    let (converter, _dir) = converter_with(SyllableDict::new(), Arc::new(IdentityNormalizer));
    for text in ["Hello, world! 123", "  spaced  out  ", "ライン\nブレイク", ""] {
        assert_eq!(converter.convert(text, &ConvertOptions::default()), text);
    }
}

#[test]
fn foreign_words_survive_byte_for_byte() {
    let (converter, _dir) = converter_with(
        synthesized_dict("라는노래야"),
        Arc::new(IdentityNormalizer),
    );
    let out = converter.convert("Let's go! 라는 노래야", &ConvertOptions::default());
    assert!(out.contains("Let's go!"), "got {:?}", out);
    assert!(kanafy_core::residue::scan(&out).is_empty());
}

#[test]
fn digits_masked_unless_convert_numbers() {
    let normalizer = Arc::new(RecordingNormalizer::default());
    let (converter, _dir) = converter_with(synthesized_dict("년"), normalizer.clone());

    let out = converter.convert("2024년", &ConvertOptions::default());
    assert!(out.starts_with("2024"), "got {:?}", out);
    assert!(!out.contains('년'));
    {
        let seen = normalizer.seen.lock().unwrap();
        assert!(
            !seen.last().unwrap().contains("2024"),
            "digits leaked to the normalizer: {:?}",
            seen
        );
    }

    let opts = ConvertOptions {
        convert_numbers: true,
        ..Default::default()
    };
    converter.convert("2024년", &opts);
    let seen = normalizer.seen.lock().unwrap();
    assert!(
        seen.last().unwrap().contains("2024"),
        "digits should reach the normalizer when convert_numbers is on: {:?}",
        seen
    );
}

#[test]
fn normalizer_fault_degrades_to_original_input() {
    let (converter, _dir) = converter_with(synthesized_dict("한글"), Arc::new(FailingNormalizer));
    let text = "한글 still here";
    assert_eq!(converter.convert(text, &ConvertOptions::default()), text);

    let detail = converter.convert_with_details(text, &ConvertOptions::default());
    assert_eq!(detail.kana, text);
    assert!(detail.error.is_some());
    assert_eq!(detail.tokens.len(), 5);
    assert!(detail.tokens.iter().all(|t| t.converted == t.token));
}

#[test]
fn exceptions_apply_before_normalization() {
    let dir = tempfile::tempdir().unwrap();
    let exceptions = ExceptionTable::new(
        vec![("노래".to_string(), "ノレ".to_string())],
        dir.path().join("user_exceptions.json"),
    );
    let converter = KanaConverter::new(
        Arc::new(synthesized_dict("야")),
        Arc::new(exceptions),
        Arc::new(IdentityNormalizer),
        NormalizeMode::Descriptive,
    );
    assert_eq!(converter.convert("노래야", &ConvertOptions::default()), "ノレヤ");
}

#[test]
fn details_report_phonetic_only_when_requested() {
    let (converter, _dir) = converter_with(synthesized_dict("한글"), Arc::new(IdentityNormalizer));
    let plain = converter.convert_with_details("한글 hi", &ConvertOptions::default());
    assert!(plain.phonetic.is_none());
    assert!(plain.tokens.iter().all(|t| t.phonetic.is_none()));

    let opts = ConvertOptions {
        include_phonetic: true,
        ..Default::default()
    };
    let detailed = converter.convert_with_details("한글 hi", &opts);
    assert_eq!(detailed.phonetic.as_deref(), Some("한글 hi"));
    let hangul_token = detailed.tokens.iter().find(|t| t.is_hangul).unwrap();
    assert_eq!(hangul_token.phonetic.as_deref(), Some("한글"));
}

#[test]
fn uncovered_syllables_show_up_as_residue() {
    let (converter, _dir) = converter_with(synthesized_dict("한"), Arc::new(IdentityNormalizer));
    let detail = converter.convert_with_details("한글", &ConvertOptions::default());
    let residue: Vec<(char, usize)> = detail
        .residue
        .iter()
        .map(|r| (r.syllable, r.count))
        .collect();
    assert_eq!(residue, vec![('글', 1)]);
}
