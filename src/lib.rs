#![doc = include_str!("../README.md")]

mod dictionary;
mod duplex;
mod errors;
mod furigana;
mod loader;
mod matcher;
mod ruby;
mod trie;
mod utils;

pub use self::dictionary::{Dictionary, RawReading, Readings};
pub use self::duplex::Duplex;
pub use self::errors::{LoadError, Result};
pub use self::furigana::{error_html, Furigana, FuriganaSegment, Html, Layout};
pub use self::loader::{parse_row, Row};
pub use self::matcher::{
    match_jukujikun, match_kana, match_kanji, Candidate, NoRecovery, UnmatchedKanji,
};
pub use self::ruby::Ruby;
pub use self::trie::{JukujikunTrie, TrieNode};
