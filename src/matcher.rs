//! Candidate generation at a pair of positions.
//!
//! Three strategies are tried in a fixed order: jukujikun, dictionary kanji, literal kana.

use crate::{dictionary::Dictionary, duplex::Duplex, trie::JukujikunTrie, utils};
use tracing::trace;

/// A segment that can be committed from the current positions, with the positions it leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate<'a> {
    /// The consumed part of the kanji text.
    pub kanji: &'a str,
    /// The consumed part of the furigana.
    pub furigana: &'a str,
    /// The kanji position after this candidate.
    pub i: usize,
    /// The furigana position after this candidate.
    pub j: usize,
}

impl<'a> Candidate<'a> {
    /// Builds the candidate that consumes the given lengths backwards from `(i, j)`.
    pub fn consume(
        w: &Duplex<'a>,
        i: usize,
        j: usize,
        kanji_len: usize,
        furigana_len: usize,
    ) -> Option<Self> {
        let (kanji, furigana, i, j) = w.original(i, j, kanji_len, furigana_len)?;
        Some(Self {
            kanji,
            furigana,
            i,
            j,
        })
    }
}

/// Recovery strategy for a dictionary kanji whose readings don't fit the furigana at all.
pub trait UnmatchedKanji: Send + Sync {
    /// Called with the positions at which the kanji ends.
    fn candidates<'a>(&self, w: &Duplex<'a>, i: usize, j: usize) -> Vec<Candidate<'a>>;
}

/// Gives up on unmatched kanji.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecovery;

impl UnmatchedKanji for NoRecovery {
    fn candidates<'a>(&self, _w: &Duplex<'a>, _i: usize, _j: usize) -> Vec<Candidate<'a>> {
        Vec::new()
    }
}

/// Matches compounds from `jukujikun` that end at `i` against the furigana that ends at `j`.
pub fn match_jukujikun<'a>(
    jukujikun: &JukujikunTrie,
    w: &Duplex<'a>,
    i: usize,
    j: usize,
) -> Vec<Candidate<'a>> {
    let mut candidates = vec![];
    let mut node = jukujikun.root();
    let mut p = i;
    // extend the compound backwards one kanji at a time for as long as the trie allows it
    while let Some((kanji, next)) = w.kanji_normal(p, 1) {
        let Some(c) = kanji.chars().next() else {
            break;
        };
        let Some(child) = node.child(c) else {
            break;
        };
        node = child;
        p = next;
        for reading in node.readings() {
            let len = reading.chars().count();
            let Some((furigana, _)) = w.furigana_normal(j, len) else {
                continue;
            };
            if furigana == reading {
                if let Some(candidate) = Candidate::consume(w, i, j, i - p, len) {
                    trace!(kanji = candidate.kanji, furigana = candidate.furigana, "jukujikun");
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates
}

/// Matches the single kanji that ends at `i` against its dictionary readings.
/// Falls back to `unmatched` when the kanji is known but none of its readings fit.
pub fn match_kanji<'a>(
    dictionary: &Dictionary,
    unmatched: &dyn UnmatchedKanji,
    w: &Duplex<'a>,
    i: usize,
    j: usize,
) -> Vec<Candidate<'a>> {
    let Some((key, _)) = w.kanji_normal(i, 1) else {
        return vec![];
    };
    let Some(readings) = dictionary.lookup_readings(key) else {
        return vec![];
    };
    let mut candidates = vec![];
    for z in 1..=j.min(dictionary.longest_reading_length(key)) {
        let Some((furigana, _)) = w.furigana_normal(j, z) else {
            break;
        };
        if readings.contains_key(furigana) {
            if let Some(candidate) = Candidate::consume(w, i, j, 1, z) {
                trace!(kanji = candidate.kanji, furigana = candidate.furigana, "kanji");
                candidates.push(candidate);
            }
        }
    }
    if candidates.is_empty() {
        trace!(kanji = key, "no reading fits");
        candidates = unmatched.candidates(w, i, j);
    }
    candidates
}

/// Matches the longest run of identical characters that ends at both `i` and `j`.
pub fn match_kana<'a>(w: &Duplex<'a>, i: usize, j: usize) -> Option<Candidate<'a>> {
    let mut z = 0;
    while z < i && z < j {
        let (Some((kanji, _)), Some((furigana, _))) =
            (w.kanji_normal(i - z, 1), w.furigana_normal(j - z, 1))
        else {
            break;
        };
        let equivalent = kanji
            .chars()
            .zip(furigana.chars())
            .all(|(k, f)| utils::literal_equivalent(k, f));
        if !equivalent {
            break;
        }
        z += 1;
    }
    if z == 0 {
        return None;
    }
    let candidate = Candidate::consume(w, i, j, z, z)?;
    trace!(kanji = candidate.kanji, furigana = candidate.furigana, "kana");
    Some(candidate)
}

/// Collects the candidates of every applicable strategy at `(i, j)`, jukujikun first.
/// Literal matching is only attempted for characters that neither dictionary knows.
pub fn candidates<'a>(
    dictionary: &Dictionary,
    jukujikun: &JukujikunTrie,
    unmatched: &dyn UnmatchedKanji,
    w: &Duplex<'a>,
    i: usize,
    j: usize,
) -> Vec<Candidate<'a>> {
    let Some((key, _)) = w.kanji_normal(i, 1) else {
        return vec![];
    };
    let in_jukujikun = key.chars().next().is_some_and(|c| jukujikun.contains_suffix(c));
    let in_dictionary = dictionary.contains_key(key);

    let mut candidates = vec![];
    if in_jukujikun {
        candidates.extend(match_jukujikun(jukujikun, w, i, j));
    }
    if in_dictionary {
        candidates.extend(match_kanji(dictionary, unmatched, w, i, j));
    }
    if !in_jukujikun && !in_dictionary {
        candidates.extend(match_kana(w, i, j));
    }
    candidates
}

#[cfg(test)]
mod test {
    use super::*;

    fn prepare(candidates: Vec<Candidate<'_>>) -> Vec<(&str, &str, usize, usize)> {
        candidates
            .into_iter()
            .map(|c| (c.kanji, c.furigana, c.i, c.j))
            .collect()
    }

    #[test]
    fn matches_jukujikun() {
        let mut trie = JukujikunTrie::new();
        trie.register("下手", "へた");
        trie.register("手", "て");
        let w = Duplex::new("下手", "へた");
        let candidates = prepare(match_jukujikun(&trie, &w, 2, 2));
        println!("{candidates:?}");
        assert_eq!(candidates, vec![("下手", "へた", 0, 0)]);
    }

    #[test]
    fn matches_nested_jukujikun() {
        let mut trie = JukujikunTrie::new();
        trie.register("手", "た");
        trie.register("下手", "へた");
        let w = Duplex::new("下手", "へた");
        let candidates = prepare(match_jukujikun(&trie, &w, 2, 2));
        println!("{candidates:?}");
        assert_eq!(
            candidates,
            vec![("手", "た", 1, 1), ("下手", "へた", 0, 0)]
        );
    }

    #[test]
    fn jukujikun_compares_normal_forms() {
        let mut trie = JukujikunTrie::new();
        trie.register("煙草", "たばこ");
        let w = Duplex::new("煙草", "タバコ");
        let candidates = prepare(match_jukujikun(&trie, &w, 2, 3));
        assert_eq!(candidates, vec![("煙草", "タバコ", 0, 0)]);
    }

    #[test]
    fn matches_every_reading_length() {
        let mut dict = Dictionary::new();
        dict.register_reading("生", "き");
        dict.register_reading("生", "いき");
        dict.register_reading("生", "せい");
        let w = Duplex::new("生", "いき");
        let candidates = prepare(match_kanji(&dict, &NoRecovery, &w, 1, 2));
        println!("{candidates:?}");
        assert_eq!(candidates, vec![("生", "き", 0, 1), ("生", "いき", 0, 0)]);
    }

    #[test]
    fn unmatched_kanji_uses_recovery() {
        struct TakeAll;
        impl UnmatchedKanji for TakeAll {
            fn candidates<'a>(&self, w: &Duplex<'a>, i: usize, j: usize) -> Vec<Candidate<'a>> {
                Candidate::consume(w, i, j, 1, j).into_iter().collect()
            }
        }

        let mut dict = Dictionary::new();
        dict.register_reading("字", "じ");
        let w = Duplex::new("字", "あざ");
        assert!(match_kanji(&dict, &NoRecovery, &w, 1, 2).is_empty());
        let candidates = prepare(match_kanji(&dict, &TakeAll, &w, 1, 2));
        assert_eq!(candidates, vec![("字", "あざ", 0, 0)]);
    }

    #[test]
    fn matches_kana_run() {
        let w = Duplex::new("食べる", "たべる");
        let candidate = match_kana(&w, 3, 3).unwrap();
        assert_eq!(
            (candidate.kanji, candidate.furigana, candidate.i, candidate.j),
            ("べる", "べる", 1, 1)
        );
        assert!(match_kana(&w, 1, 1).is_none());
    }

    #[test]
    fn kana_run_stops_at_boundary() {
        let w = Duplex::new("のの", "もののの");
        let candidate = match_kana(&w, 2, 4).unwrap();
        assert_eq!((candidate.kanji, candidate.i, candidate.j), ("のの", 0, 2));
    }

    #[test]
    fn kana_ignores_script_and_small_ke() {
        let w = Duplex::new("一ヶ", "いっか");
        let candidate = match_kana(&w, 2, 3).unwrap();
        assert_eq!((candidate.kanji, candidate.furigana), ("ヶ", "か"));

        let w = Duplex::new("れる", "レル");
        let candidate = match_kana(&w, 2, 2).unwrap();
        assert_eq!((candidate.kanji, candidate.furigana), ("れる", "レル"));
    }

    #[test]
    fn kana_only_for_unknown_characters() {
        let mut dict = Dictionary::new();
        dict.register_reading("字", "じ");
        let trie = JukujikunTrie::new();
        let w = Duplex::new("字", "じ");
        let found = prepare(candidates(&dict, &trie, &NoRecovery, &w, 1, 1));
        assert_eq!(found, vec![("字", "じ", 0, 0)]);

        let w = Duplex::new("の", "の");
        let found = prepare(candidates(&dict, &trie, &NoRecovery, &w, 1, 1));
        assert_eq!(found, vec![("の", "の", 0, 0)]);

        let w = Duplex::new("字の", "じの");
        let found = prepare(candidates(&dict, &trie, &NoRecovery, &w, 1, 1));
        assert_eq!(found, vec![("字", "じ", 0, 0)]);
        assert!(candidates(&dict, &trie, &NoRecovery, &w, 0, 1).is_empty());
    }

    #[test]
    fn jukujikun_comes_before_kanji() {
        let mut dict = Dictionary::new();
        dict.register_reading("日", "ひ");
        dict.register_reading("日", "にち");
        let mut trie = JukujikunTrie::new();
        trie.register("今日", "きょう");
        let w = Duplex::new("今日", "きょう");
        let found = prepare(candidates(&dict, &trie, &NoRecovery, &w, 2, 3));
        println!("{found:?}");
        assert_eq!(found, vec![("今日", "きょう", 0, 0)]);
    }
}
