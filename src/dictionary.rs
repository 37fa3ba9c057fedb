//! Kanji to reading table.

use crate::utils;
use std::collections::HashMap;

/// Readings of a single kanji, mapped to the remainder marker that came with them.
pub type Readings = HashMap<String, String>;

/// Maps each kanji to its readings, along with the length of its longest reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    furigana: HashMap<String, Readings>,
    // derived from `furigana`, never modified on its own
    longest: HashMap<String, usize>,
}

/// A raw reading split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading<'a> {
    /// The reading proper, before normalization.
    pub reading: &'a str,
    /// The okurigana that follows the `.` marker, if any.
    pub okurigana: &'a str,
    /// The explicit remainder that follows the `/` marker, if any.
    pub remainder: Option<&'a str>,
}

impl<'a> RawReading<'a> {
    /// Parses a reading such as `た.べる`, `-さん` or `ひと/つ`.
    /// `-` marks a prefix or suffix form and is dropped, `.` starts the okurigana
    /// and `/` starts an explicit remainder.
    pub fn parse(raw: &'a str) -> Self {
        let raw = raw.trim();
        let (reading, remainder) = match raw.split_once('/') {
            Some((reading, remainder)) => (reading, Some(remainder.trim())),
            None => (raw, None),
        };
        let reading = reading.trim().trim_matches('-').trim();
        let (reading, okurigana) = reading.split_once('.').unwrap_or((reading, ""));
        Self {
            reading: reading.trim_end(),
            okurigana: okurigana.trim_start(),
            remainder,
        }
    }

    /// The remainder marker to store: the explicit remainder if given, the okurigana otherwise.
    pub fn remainder(&self) -> &'a str {
        self.remainder.unwrap_or(self.okurigana)
    }
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the readings registered for `key`, if any.
    pub fn lookup_readings(&self, key: &str) -> Option<&Readings> {
        self.furigana.get(key)
    }

    /// Returns the character length of the longest reading of `key`, or 0 for unknown keys.
    pub fn longest_reading_length(&self, key: &str) -> usize {
        self.longest.get(key).copied().unwrap_or(0)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.furigana.contains_key(key)
    }

    /// The number of kanji with at least one reading.
    pub fn len(&self) -> usize {
        self.furigana.len()
    }

    pub fn is_empty(&self) -> bool {
        self.furigana.is_empty()
    }

    /// Parses and registers a raw reading for `key`.
    /// Returns false if the reading was empty and thus skipped.
    pub fn register_reading(&mut self, key: &str, raw: &str) -> bool {
        let parsed = RawReading::parse(raw);
        let reading = utils::normalize(parsed.reading);
        if reading.is_empty() {
            return false;
        }
        let len = reading.chars().count();
        self.furigana
            .entry(key.to_string())
            .or_default()
            .insert(reading, parsed.remainder().to_string());
        let longest = self.longest.entry(key.to_string()).or_default();
        *longest = (*longest).max(len);
        true
    }

    /// Replaces the readings of `key`, normalizing them and dropping empty ones.
    pub(crate) fn insert_readings(&mut self, key: String, readings: Readings) {
        let readings: Readings = readings
            .into_iter()
            .map(|(reading, remainder)| (utils::normalize(reading.trim()), remainder))
            .filter(|(reading, _)| !reading.is_empty())
            .collect();
        match readings.keys().map(|r| r.chars().count()).max() {
            Some(longest) => {
                self.longest.insert(key.clone(), longest);
                self.furigana.insert(key, readings);
            }
            None => {
                self.longest.remove(&key);
                self.furigana.remove(&key);
            }
        }
    }

    /// Recomputes the longest reading length of every key.
    pub fn refresh_longest(&mut self) {
        self.longest = self
            .furigana
            .iter()
            .map(|(key, readings)| {
                let longest = readings
                    .keys()
                    .map(|r| r.chars().count())
                    .max()
                    .unwrap_or(0);
                (key.clone(), longest)
            })
            .collect();
    }
}
