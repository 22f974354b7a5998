// core/src/residue.rs
//
// Residue diagnostics: residual Hangul syllables left in pipeline output
// signal dictionary gaps. Counting is pure and never fails; the ranked
// output (descending count, first-seen order breaking ties) drives offline
// curation from the most frequent gap down.

use ahash::AHashMap;
use serde::Serialize;

use crate::jamo;

/// One residual syllable with its occurrence count, exportable for
/// downstream tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidueRecord {
    pub syllable: char,
    pub count: usize,
}

/// Frequency accumulator usable over a whole corpus, one `observe` per
/// converted text.
#[derive(Debug, Default)]
pub struct ResidueCounter {
    counts: AHashMap<char, usize>,
    first_seen: Vec<char>,
}

impl ResidueCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count residual Hangul syllable codepoints in `text`. Jamo letters and
    /// anything outside the syllable block are ignored.
    pub fn observe(&mut self, text: &str) {
        for ch in text.chars() {
            if !jamo::is_syllable(ch) {
                continue;
            }
            let entry = self.counts.entry(ch).or_insert(0);
            if *entry == 0 {
                self.first_seen.push(ch);
            }
            *entry += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }

    /// Ranked records: descending count, ties in first-seen order.
    pub fn ranked(&self) -> Vec<ResidueRecord> {
        let mut records: Vec<ResidueRecord> = self
            .first_seen
            .iter()
            .map(|&syllable| ResidueRecord {
                syllable,
                count: self.counts[&syllable],
            })
            .collect();
        // Stable sort keeps first-seen order within equal counts.
        records.sort_by(|a, b| b.count.cmp(&a.count));
        records
    }
}

/// Ranked residue of a single text.
pub fn scan(text: &str) -> Vec<ResidueRecord> {
    let mut counter = ResidueCounter::new();
    counter.observe(text);
    counter.ranked()
}

/// Compact `가(3), 나(1)` rendering for warning logs.
pub fn format_ranked(records: &[ResidueRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}({})", r.syllable, r.count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(records: &[ResidueRecord]) -> Vec<(char, usize)> {
        records.iter().map(|r| (r.syllable, r.count)).collect()
    }

    #[test]
    fn scan_ignores_non_syllables() {
        let records = scan("テストㄱ가나다");
        assert_eq!(pairs(&records), vec![('가', 1), ('나', 1), ('다', 1)]);
    }

    #[test]
    fn ranked_sorts_by_count_then_first_seen() {
        let records = scan("나가나 다나");
        assert_eq!(pairs(&records), vec![('나', 3), ('가', 1), ('다', 1)]);
    }

    #[test]
    fn counter_aggregates_across_observations() {
        let mut counter = ResidueCounter::new();
        counter.observe("가나");
        counter.observe("가다");
        assert_eq!(
            pairs(&counter.ranked()),
            vec![('가', 2), ('나', 1), ('다', 1)]
        );
    }

    #[test]
    fn clean_text_is_empty() {
        assert!(scan("all kana ハングル already").is_empty());
    }

    #[test]
    fn format_ranked_renders_counts() {
        assert_eq!(format_ranked(&scan("가가나")), "가(2), 나(1)");
    }
}
