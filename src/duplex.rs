//! A synchronized view over a word and its reading.
//!
//! Both strings are consumed from the end towards the start. A position counts how many characters
//! of a string are still left to consume, so `0` means the string is exhausted.

use crate::utils;

/// One side of a `Duplex`: the original text and its normal form, both addressable by character.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Track<'a> {
    original: &'a str,
    // byte offset of every character boundary in `original`, including the end
    original_bounds: Vec<usize>,
    normal: String,
    normal_bounds: Vec<usize>,
}

impl<'a> Track<'a> {
    fn new(original: &'a str) -> Self {
        let normal = utils::normalize(original);
        Self {
            original_bounds: bounds(original),
            normal_bounds: bounds(&normal),
            original,
            normal,
        }
    }

    fn len(&self) -> usize {
        self.original_bounds.len() - 1
    }

    // the `len` characters ending at `end`, along with the new position
    fn normal(&self, end: usize, len: usize) -> Option<(&str, usize)> {
        let start = end.checked_sub(len)?;
        let slice = self
            .normal
            .get(*self.normal_bounds.get(start)?..*self.normal_bounds.get(end)?)?;
        Some((slice, start))
    }

    fn original(&self, end: usize, len: usize) -> Option<(&'a str, usize)> {
        let start = end.checked_sub(len)?;
        let slice = self
            .original
            .get(*self.original_bounds.get(start)?..*self.original_bounds.get(end)?)?;
        Some((slice, start))
    }
}

fn bounds(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Dual cursor over a kanji text and its furigana.
/// Lookups return slices of the normalized form (katakana folded to hiragana) or of the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplex<'a> {
    kanji: Track<'a>,
    furigana: Track<'a>,
}

impl<'a> Duplex<'a> {
    pub fn new(kanji: &'a str, furigana: &'a str) -> Self {
        Self {
            kanji: Track::new(kanji),
            furigana: Track::new(furigana),
        }
    }

    /// The original kanji text.
    pub fn kanji(&self) -> &'a str {
        self.kanji.original
    }

    /// The original furigana text.
    pub fn furigana(&self) -> &'a str {
        self.furigana.original
    }

    pub fn kanji_len(&self) -> usize {
        self.kanji.len()
    }

    pub fn furigana_len(&self) -> usize {
        self.furigana.len()
    }

    /// Resolves omitted positions to the start of the search, i.e. the full length of each string.
    pub fn seek(&self, i: Option<usize>, j: Option<usize>) -> (usize, usize) {
        let i = i.map_or(self.kanji_len(), |i| i.min(self.kanji_len()));
        let j = j.map_or(self.furigana_len(), |j| j.min(self.furigana_len()));
        (i, j)
    }

    /// The `len` normalized kanji characters ending at `i`.
    pub fn kanji_normal(&self, i: usize, len: usize) -> Option<(&str, usize)> {
        self.kanji.normal(i, len)
    }

    /// The `len` normalized furigana characters ending at `j`.
    pub fn furigana_normal(&self, j: usize, len: usize) -> Option<(&str, usize)> {
        self.furigana.normal(j, len)
    }

    pub fn kanji_original(&self, i: usize, len: usize) -> Option<(&'a str, usize)> {
        self.kanji.original(i, len)
    }

    /// Materializes the original text consumed by moving from `(i, j)` back by the given deltas.
    pub fn original(
        &self,
        i: usize,
        j: usize,
        kanji_delta: usize,
        furigana_delta: usize,
    ) -> Option<(&'a str, &'a str, usize, usize)> {
        let (kanji, p) = self.kanji.original(i, kanji_delta)?;
        let (furigana, q) = self.furigana.original(j, furigana_delta)?;
        Some((kanji, furigana, p, q))
    }
}
