//! Trie of jukujikun, compounds that are read as a whole.
//!
//! Keys are stored last character first so that a compound can be found by walking the kanji text
//! backwards from the current position.

use crate::utils;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    children: HashMap<char, TrieNode>,
    /// Readings of the compound that ends at this node, in insertion order.
    readings: Vec<String>,
}

impl TrieNode {
    pub fn child(&self, c: char) -> Option<&TrieNode> {
        self.children.get(&c)
    }

    pub fn readings(&self) -> &[String] {
        &self.readings
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JukujikunTrie {
    root: TrieNode,
    len: usize,
}

impl JukujikunTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Checks whether some compound ends with `c`.
    pub fn contains_suffix(&self, c: char) -> bool {
        self.root.children.contains_key(&c)
    }

    /// The number of distinct (compound, reading) pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Registers `reading` as a reading of the whole compound `key`.
    /// Returns false if the reading was empty or already registered.
    pub fn register(&mut self, key: &str, reading: &str) -> bool {
        let reading = utils::normalize(reading.trim());
        if reading.is_empty() || key.is_empty() {
            return false;
        }
        let mut node = &mut self.root;
        for c in key.chars().rev() {
            node = node.children.entry(c).or_default();
        }
        if node.readings.contains(&reading) {
            return false;
        }
        node.readings.push(reading);
        self.len += 1;
        true
    }

    /// Returns the readings registered for exactly `key`.
    pub fn lookup(&self, key: &str) -> Option<&[String]> {
        let mut node = &self.root;
        for c in key.chars().rev() {
            node = node.child(c)?;
        }
        if node.readings.is_empty() {
            None
        } else {
            Some(node.readings())
        }
    }
}
