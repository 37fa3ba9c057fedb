//! Backtracking alignment of a word with its reading.

use crate::{
    dictionary::Dictionary,
    duplex::Duplex,
    errors::Result,
    furigana::{self, Furigana, FuriganaSegment, Layout},
    loader,
    matcher::{self, Candidate, NoRecovery, UnmatchedKanji},
    trie::JukujikunTrie,
};
use std::{collections::HashSet, io::Read, path::Path};
use tracing::{debug, debug_span, trace, warn};

/// Aligns words with their readings using a kanji dictionary and a jukujikun trie.
///
/// The dictionaries are only read while aligning, so a single `Ruby` can serve any number of requests,
/// including from several threads at once.
pub struct Ruby {
    dictionary: Dictionary,
    jukujikun: JukujikunTrie,
    explicit: bool,
    step_limit: Option<usize>,
    unmatched: Box<dyn UnmatchedKanji>,
}

impl Default for Ruby {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ruby {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ruby")
            .field("kanji", &self.dictionary.len())
            .field("jukujikun", &self.jukujikun.len())
            .field("explicit", &self.explicit)
            .field("step_limit", &self.step_limit)
            .finish_non_exhaustive()
    }
}

// the step budget ran out
struct Exhausted;

// what the search finds on arriving at a pair of positions
enum Visit<'a> {
    Aligned,
    Dead,
    Branch(Vec<Candidate<'a>>),
}

// a position whose candidates are being tried
struct Frame<'a> {
    i: usize,
    j: usize,
    candidates: std::vec::IntoIter<Candidate<'a>>,
}

// state of a single alignment request
struct Search<'r, 'a> {
    ruby: &'r Ruby,
    w: Duplex<'a>,
    // positions from which no alignment can be reached
    dead: HashSet<(usize, usize)>,
    steps: usize,
    // committed segments, last segment of the word first
    stack: Vec<FuriganaSegment<'a>>,
}

impl<'r, 'a> Search<'r, 'a> {
    fn new(ruby: &'r Ruby, kanji: &'a str, furigana: &'a str) -> Self {
        Self {
            ruby,
            w: Duplex::new(kanji, furigana),
            dead: HashSet::new(),
            steps: 0,
            stack: vec![],
        }
    }

    fn visit(&mut self, i: usize, j: usize, depth: usize) -> Result<Visit<'a>, Exhausted> {
        trace!(depth, i, j, "split");
        if i == 0 {
            // both strings must run out together
            return Ok(if j == 0 { Visit::Aligned } else { Visit::Dead });
        }
        if j == 0 {
            if self.ruby.explicit {
                return Ok(Visit::Dead);
            }
            // the rest of the word is kept without a reading
            let Some((kanji, _)) = self.w.kanji_original(i, i) else {
                return Ok(Visit::Dead);
            };
            trace!(depth, kanji, "unannotated");
            self.stack.push(FuriganaSegment {
                segment: kanji,
                furigana: None,
            });
            return Ok(Visit::Aligned);
        }
        if self.dead.contains(&(i, j)) {
            return Ok(Visit::Dead);
        }

        self.steps += 1;
        if self.ruby.step_limit.is_some_and(|limit| self.steps > limit) {
            return Err(Exhausted);
        }

        let candidates = self.ruby.candidates(&self.w, i, j);
        if candidates.is_empty() {
            self.dead.insert((i, j));
            return Ok(Visit::Dead);
        }
        Ok(Visit::Branch(candidates))
    }

    // depth-first search from `(i, j)`, keeping the pending candidates of every level on the heap
    // returns Ok(true) once both strings are exhausted, leaving the alignment in `stack`
    fn split(&mut self, i: usize, j: usize) -> Result<bool, Exhausted> {
        let mut frames = match self.visit(i, j, 0)? {
            Visit::Aligned => return Ok(true),
            Visit::Dead => return Ok(false),
            Visit::Branch(candidates) => vec![Frame {
                i,
                j,
                candidates: candidates.into_iter(),
            }],
        };

        while let Some(frame) = frames.last_mut() {
            let Some(Candidate {
                kanji,
                furigana,
                i: p,
                j: q,
            }) = frame.candidates.next()
            else {
                // every candidate of this position failed
                if let Some(frame) = frames.pop() {
                    self.dead.insert((frame.i, frame.j));
                }
                if !frames.is_empty() {
                    self.stack.pop();
                }
                continue;
            };

            let depth = frames.len();
            trace!(depth, kanji, furigana, p, q, "trying");
            self.stack.push(FuriganaSegment {
                segment: kanji,
                furigana: Some(furigana),
            });
            match self.visit(p, q, depth)? {
                Visit::Aligned => return Ok(true),
                Visit::Dead => {
                    self.stack.pop();
                }
                Visit::Branch(candidates) => frames.push(Frame {
                    i: p,
                    j: q,
                    candidates: candidates.into_iter(),
                }),
            }
        }
        Ok(false)
    }
}

impl Ruby {
    /// An empty aligner in explicit mode.
    pub fn new() -> Self {
        Self {
            dictionary: Dictionary::new(),
            jukujikun: JukujikunTrie::new(),
            explicit: true,
            step_limit: None,
            unmatched: Box::new(NoRecovery),
        }
    }

    /// Loads `furigana.json` and `jukujikun.json` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut ruby = Self::new();
        let furigana = dir.join("furigana.json");
        let rows = loader::read_furigana_json(loader::open(&furigana)?, &mut ruby.dictionary)?;
        loader::log_loaded("furigana", &furigana, rows);
        let jukujikun = dir.join("jukujikun.json");
        let rows = loader::read_jukujikun_json(loader::open(&jukujikun)?, &mut ruby.jukujikun)?;
        loader::log_loaded("jukujikun", &jukujikun, rows);
        Ok(ruby)
    }

    /// In explicit mode, a word whose reading runs out before the word does can't be aligned.
    /// Otherwise the rest of the word is kept as a segment without furigana.
    /// Defaults to true.
    pub fn explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }

    /// Caps the number of positions a single alignment may visit.
    /// A request that goes over the limit is abandoned as if no alignment existed.
    pub fn step_limit(mut self, step_limit: Option<usize>) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Sets the recovery strategy for kanji whose readings don't fit the furigana.
    pub fn unmatched_kanji(mut self, unmatched: impl UnmatchedKanji + 'static) -> Self {
        self.unmatched = Box::new(unmatched);
        self
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn jukujikun(&self) -> &JukujikunTrie {
        &self.jukujikun
    }

    /// Registers a kanji reading, see [`Dictionary::register_reading`].
    pub fn push_furigana(&mut self, key: &str, reading: &str) -> bool {
        self.dictionary.register_reading(key, reading)
    }

    /// Registers the reading of a whole compound.
    pub fn push_jukujikun(&mut self, key: &str, reading: &str) -> bool {
        self.jukujikun.register(key, reading)
    }

    /// Loads a tab-separated kanji table.
    /// Readings may use `-` to mark a prefix or suffix form and `.` to mark the start of the okurigana.
    pub fn load_furigana(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let rows = loader::read_furigana(loader::open(path)?, &mut self.dictionary)?;
        loader::log_loaded("furigana", path, rows);
        Ok(rows)
    }

    /// Loads a tab-separated table of compound readings.
    pub fn load_jukujikun(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let rows = loader::read_jukujikun(loader::open(path)?, &mut self.jukujikun)?;
        loader::log_loaded("jukujikun", path, rows);
        Ok(rows)
    }

    pub fn load_furigana_json(&mut self, reader: impl Read) -> Result<usize> {
        loader::read_furigana_json(reader, &mut self.dictionary)
    }

    pub fn load_jukujikun_json(&mut self, reader: impl Read) -> Result<usize> {
        loader::read_jukujikun_json(reader, &mut self.jukujikun)
    }

    /// Candidates for the segment that ends at `(i, j)`, in the order they should be tried.
    pub fn candidates<'a>(&self, w: &Duplex<'a>, i: usize, j: usize) -> Vec<Candidate<'a>> {
        matcher::candidates(
            &self.dictionary,
            &self.jukujikun,
            self.unmatched.as_ref(),
            w,
            i,
            j,
        )
    }

    /// Splits `kanji` into segments aligned with `furigana`.
    /// Returns the first alignment found, or None if there is none.
    pub fn split<'a>(&self, kanji: &'a str, furigana: &'a str) -> Option<Furigana<'a>> {
        let span = debug_span!("split", kanji, furigana);
        let _enter = span.enter();

        let mut search = Search::new(self, kanji, furigana);
        let (i, j) = search.w.seek(None, None);
        match search.split(i, j) {
            Ok(true) => {
                let mut furigana = search.stack;
                furigana.reverse();
                debug!(segments = furigana.len(), steps = search.steps, "aligned");
                Some(Furigana { furigana })
            }
            Ok(false) => {
                if self.explicit {
                    self.failed_split(&search.w);
                }
                None
            }
            Err(Exhausted) => {
                warn!(steps = search.steps, "step limit reached, giving up");
                None
            }
        }
    }

    fn failed_split(&self, w: &Duplex<'_>) {
        debug!(kanji = w.kanji(), furigana = w.furigana(), "no alignment");
    }

    /// Aligns the word and renders it with ruby tags.
    /// Falls back to a single `r_error` ruby around the raw inputs if the word can't be aligned.
    pub fn to_html5(&self, kanji: &str, furigana: &str, layout: Layout) -> String {
        match self.split(kanji, furigana) {
            Some(aligned) => aligned.html(layout).to_string(),
            None => furigana::error_html(kanji, furigana),
        }
    }
}
