// core/src/jamo.rs
//
// Hangul syllable codec: decompose precomposed syllables (U+AC00..U+D7A3)
// into (onset, vowel, coda) jamo indices, recompose them, and synthesize a
// katakana rendering for any index combination.
//
// Synthesis is the total fallback used by offline curation; request-time
// conversion goes through the static syllable dictionary instead.

/// First codepoint of the precomposed Hangul syllable block.
pub const SYLLABLE_BASE: u32 = 0xAC00;
/// Last codepoint of the precomposed Hangul syllable block.
pub const SYLLABLE_LAST: u32 = 0xD7A3;

pub const ONSET_COUNT: usize = 19;
pub const VOWEL_COUNT: usize = 21;
pub const CODA_COUNT: usize = 28;

/// Onset (choseong) letters in Unicode index order.
const ONSET_NAMES: [char; ONSET_COUNT] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ',
    'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// Vowel (jungseong) letters in Unicode index order.
const VOWEL_NAMES: [char; VOWEL_COUNT] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ',
    'ㅞ', 'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

/// Coda (jongseong) letters; index 0 is "no coda".
const CODA_NAMES: [Option<char>; CODA_COUNT] = [
    None,
    Some('ㄱ'), Some('ㄲ'), Some('ㄳ'), Some('ㄴ'), Some('ㄵ'), Some('ㄶ'), Some('ㄷ'),
    Some('ㄹ'), Some('ㄺ'), Some('ㄻ'), Some('ㄼ'), Some('ㄽ'), Some('ㄾ'), Some('ㄿ'),
    Some('ㅀ'), Some('ㅁ'), Some('ㅂ'), Some('ㅄ'), Some('ㅅ'), Some('ㅆ'), Some('ㅇ'),
    Some('ㅈ'), Some('ㅊ'), Some('ㅋ'), Some('ㅌ'), Some('ㅍ'), Some('ㅎ'),
];

/// Onset index 11 is ㅇ: no consonant, vowels render through a direct table.
const NULL_ONSET: usize = 11;

/// Per-onset base kana indexed by phonetic column (a, i, u, e, o).
/// Tense series carry a leading small tsu.
const ONSET_KANA: [[&str; 5]; ONSET_COUNT] = [
    ["ガ", "ギ", "グ", "ゲ", "ゴ"],                 // ㄱ
    ["ッカ", "ッキ", "ック", "ッケ", "ッコ"],       // ㄲ
    ["ナ", "ニ", "ヌ", "ネ", "ノ"],                 // ㄴ
    ["ダ", "ディ", "ドゥ", "デ", "ド"],             // ㄷ
    ["ッタ", "ッティ", "ットゥ", "ッテ", "ット"],   // ㄸ
    ["ラ", "リ", "ル", "レ", "ロ"],                 // ㄹ
    ["マ", "ミ", "ム", "メ", "モ"],                 // ㅁ
    ["バ", "ビ", "ブ", "ベ", "ボ"],                 // ㅂ
    ["ッパ", "ッピ", "ップ", "ッペ", "ッポ"],       // ㅃ
    ["サ", "シ", "ス", "セ", "ソ"],                 // ㅅ
    ["ッサ", "ッシ", "ッス", "ッセ", "ッソ"],       // ㅆ
    ["ア", "イ", "ウ", "エ", "オ"],                 // ㅇ
    ["ジャ", "ジ", "ジュ", "ジェ", "ジョ"],         // ㅈ
    ["ッチャ", "ッチ", "ッチュ", "ッチェ", "ッチョ"], // ㅉ
    ["チャ", "チ", "チュ", "チェ", "チョ"],         // ㅊ
    ["カ", "キ", "ク", "ケ", "コ"],                 // ㅋ
    ["タ", "ティ", "トゥ", "テ", "ト"],             // ㅌ
    ["パ", "ピ", "プ", "ペ", "ポ"],                 // ㅍ
    ["ハ", "ヒ", "フ", "ヘ", "ホ"],                 // ㅎ
];

/// Per-vowel rendering rule: (phonetic column, small-kana suffix).
/// Columns: 0=a, 1=i, 2=u, 3=e, 4=o.
const VOWEL_RULES: [(usize, &str); VOWEL_COUNT] = [
    (0, ""),   // ㅏ
    (3, ""),   // ㅐ
    (1, "ャ"), // ㅑ
    (3, ""),   // ㅒ
    (4, ""),   // ㅓ
    (3, ""),   // ㅔ
    (1, "ョ"), // ㅕ
    (3, ""),   // ㅖ
    (4, ""),   // ㅗ
    (2, "ァ"), // ㅘ
    (2, "ェ"), // ㅙ
    (2, "ェ"), // ㅚ
    (1, "ョ"), // ㅛ
    (2, ""),   // ㅜ
    (2, "ォ"), // ㅝ
    (2, "ェ"), // ㅞ
    (2, "ィ"), // ㅟ
    (1, "ュ"), // ㅠ
    (2, ""),   // ㅡ
    (1, ""),   // ㅢ
    (1, ""),   // ㅣ
];

/// Direct vowel renderings for the null onset. Diphthongs become a single
/// kana unit here (ヤ, ワ, ...) rather than column form + suffix.
const NULL_ONSET_KANA: [&str; VOWEL_COUNT] = [
    "ア", "エ", "ヤ", "イェ", "オ", "エ", "ヨ", "イェ", "オ", "ワ", "ウェ", "ウェ", "ヨ",
    "ウ", "ウォ", "ウェ", "ウィ", "ユ", "ウ", "エ", "イ",
];

/// Trailing kana per coda, chosen by manner of articulation: stops map to a
/// glottal stop mark or a matching consonant reading, nasals to ン/ム,
/// liquids to ル. Index 0 (no coda) is empty.
const CODA_TRAIL: [&str; CODA_COUNT] = [
    "",   //
    "ク", // ㄱ
    "ッ", // ㄲ
    "ッ", // ㄳ
    "ン", // ㄴ
    "ン", // ㄵ
    "ン", // ㄶ
    "ッ", // ㄷ
    "ル", // ㄹ
    "ッ", // ㄺ
    "ム", // ㄻ
    "プ", // ㄼ
    "ル", // ㄽ
    "ル", // ㄾ
    "プ", // ㄿ
    "ル", // ㅀ
    "ム", // ㅁ
    "ッ", // ㅂ
    "ッ", // ㅄ
    "ッ", // ㅅ
    "ッ", // ㅆ
    "ン", // ㅇ
    "ッ", // ㅈ
    "ッ", // ㅊ
    "ク", // ㅋ
    "ッ", // ㅌ
    "プ", // ㅍ
    "ッ", // ㅎ
];

/// True if `ch` is a precomposed Hangul syllable.
pub fn is_syllable(ch: char) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&(ch as u32))
}

/// Decompose a precomposed syllable into (onset, vowel, coda) indices.
///
/// Returns `None` for any codepoint outside the syllable block; this is the
/// typed "not a syllable" result, not an error.
pub fn decompose(ch: char) -> Option<(usize, usize, usize)> {
    if !is_syllable(ch) {
        return None;
    }
    let rem = (ch as u32 - SYLLABLE_BASE) as usize;
    let coda = rem % CODA_COUNT;
    let vowel = (rem / CODA_COUNT) % VOWEL_COUNT;
    let onset = rem / (CODA_COUNT * VOWEL_COUNT);
    Some((onset, vowel, coda))
}

/// Recompose (onset, vowel, coda) indices into a syllable codepoint.
/// Inverse of [`decompose`]; `None` for out-of-range indices.
pub fn compose(onset: usize, vowel: usize, coda: usize) -> Option<char> {
    if onset >= ONSET_COUNT || vowel >= VOWEL_COUNT || coda >= CODA_COUNT {
        return None;
    }
    let code = SYLLABLE_BASE + ((onset * VOWEL_COUNT + vowel) * CODA_COUNT + coda) as u32;
    char::from_u32(code)
}

/// Compatibility-jamo letters for display: (onset, vowel, optional coda).
/// Out-of-range onset/vowel indices render as '?'.
pub fn jamo_names(onset: usize, vowel: usize, coda: usize) -> (char, char, Option<char>) {
    let o = ONSET_NAMES.get(onset).copied().unwrap_or('?');
    let v = VOWEL_NAMES.get(vowel).copied().unwrap_or('?');
    let c = CODA_NAMES.get(coda).copied().flatten();
    (o, v, c)
}

/// Trailing kana for a coda index; empty for no coda or out-of-range.
pub fn coda_trail(coda: usize) -> &'static str {
    CODA_TRAIL.get(coda).copied().unwrap_or("")
}

/// Synthesize a kana rendering for a jamo index triple.
///
/// Total over the 19x21x28 domain; `None` only for out-of-range onset or
/// vowel ("no rule"). An unmapped coda falls back to no trailing kana.
pub fn synthesize(onset: usize, vowel: usize, coda: usize) -> Option<String> {
    let body = if onset == NULL_ONSET {
        NULL_ONSET_KANA.get(vowel)?.to_string()
    } else {
        let forms = ONSET_KANA.get(onset)?;
        let (column, suffix) = VOWEL_RULES.get(vowel)?;
        format!("{}{}", forms[*column], suffix)
    };
    Some(format!("{}{}", body, coda_trail(coda)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_known_syllables() {
        // 한 = ㅎ + ㅏ + ㄴ
        assert_eq!(decompose('한'), Some((18, 0, 4)));
        // 글 = ㄱ + ㅡ + ㄹ
        assert_eq!(decompose('글'), Some((0, 18, 8)));
        // 가 = first syllable of the block
        assert_eq!(decompose('가'), Some((0, 0, 0)));
    }

    #[test]
    fn decompose_rejects_non_syllables() {
        assert_eq!(decompose('a'), None);
        assert_eq!(decompose('ㄱ'), None); // compatibility jamo, not a syllable
        assert_eq!(decompose('カ'), None);
        assert_eq!(decompose('\u{ABFF}'), None); // one below the block
        assert_eq!(decompose('\u{D7A4}'), None); // one above the block
    }

    #[test]
    fn compose_inverts_decompose_at_block_edges() {
        for ch in ['가', '힣', '한', '글', '뮤'] {
            let (o, v, c) = decompose(ch).unwrap();
            assert_eq!(compose(o, v, c), Some(ch));
        }
    }

    #[test]
    fn compose_rejects_out_of_range() {
        assert_eq!(compose(19, 0, 0), None);
        assert_eq!(compose(0, 21, 0), None);
        assert_eq!(compose(0, 0, 28), None);
    }

    #[test]
    fn synthesize_known_renderings() {
        assert_eq!(synthesize(18, 0, 4).as_deref(), Some("ハン")); // 한
        assert_eq!(synthesize(0, 18, 8).as_deref(), Some("グル")); // 글
        assert_eq!(synthesize(11, 9, 0).as_deref(), Some("ワ")); // 와: null onset diphthong
        assert_eq!(synthesize(12, 2, 0).as_deref(), Some("ジャ")); // 쟈: i-column + small ya
    }

    #[test]
    fn synthesize_rejects_out_of_range() {
        assert_eq!(synthesize(19, 0, 0), None);
        assert_eq!(synthesize(0, 21, 0), None);
    }

    #[test]
    fn jamo_names_display() {
        assert_eq!(jamo_names(18, 0, 4), ('ㅎ', 'ㅏ', Some('ㄴ')));
        assert_eq!(jamo_names(0, 0, 0), ('ㄱ', 'ㅏ', None));
        assert_eq!(jamo_names(99, 99, 99), ('?', '?', None));
    }
}
