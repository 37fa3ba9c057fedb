//! Reading tables on disk.
//!
//! Tab-separated tables hold one key per row followed by its readings:
//! ```text
//! 食	た.べる	ショク
//! 下手	へた
//! ```
//! JSON tables map keys to `{ reading: remainder }` objects for kanji and to reading arrays for jukujikun.

use crate::{
    dictionary::{Dictionary, Readings},
    errors::{LoadError, Result},
    trie::JukujikunTrie,
};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};
use tracing::{debug, info};

/// A parsed row of a tab-separated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub key: &'a str,
    pub readings: Vec<&'a str>,
}

/// Splits a line into its key and readings. Returns None for blank lines.
pub fn parse_row(line: &str) -> Option<Row<'_>> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
    let key = fields.next()?.trim();
    if key.is_empty() {
        return None;
    }
    Some(Row {
        key,
        readings: fields.collect(),
    })
}

fn for_each_row(reader: impl BufRead, mut f: impl FnMut(Row<'_>)) -> Result<usize> {
    let mut rows = 0;
    for line in reader.lines() {
        let line = line?;
        if let Some(row) = parse_row(&line) {
            f(row);
            rows += 1;
        }
    }
    Ok(rows)
}

/// Registers every reading of a tab-separated kanji table. Returns the number of rows read.
pub fn read_furigana(reader: impl BufRead, dictionary: &mut Dictionary) -> Result<usize> {
    for_each_row(reader, |row| {
        for reading in row.readings {
            if !dictionary.register_reading(row.key, reading) {
                debug!(key = row.key, "skipping empty reading");
            }
        }
    })
}

/// Registers every reading of a tab-separated jukujikun table. Returns the number of rows read.
pub fn read_jukujikun(reader: impl BufRead, jukujikun: &mut JukujikunTrie) -> Result<usize> {
    for_each_row(reader, |row| {
        for reading in row.readings {
            jukujikun.register(row.key, reading);
        }
    })
}

pub fn read_furigana_json(reader: impl Read, dictionary: &mut Dictionary) -> Result<usize> {
    let table: HashMap<String, Readings> = serde_json::from_reader(reader)?;
    let rows = table.len();
    for (key, readings) in table {
        dictionary.insert_readings(key, readings);
    }
    dictionary.refresh_longest();
    Ok(rows)
}

pub fn read_jukujikun_json(reader: impl Read, jukujikun: &mut JukujikunTrie) -> Result<usize> {
    let table: HashMap<String, Vec<String>> = serde_json::from_reader(reader)?;
    let rows = table.len();
    // sorted for a stable reading order across runs
    let mut table: Vec<_> = table.into_iter().collect();
    table.sort();
    for (key, readings) in table {
        for reading in readings {
            jukujikun.register(&key, &reading);
        }
    }
    Ok(rows)
}

pub(crate) fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    Ok(BufReader::new(file))
}

pub(crate) fn log_loaded(what: &str, path: &Path, rows: usize) {
    info!("loaded {rows} {what} rows from {}", path.display());
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_rows() {
        let row = parse_row("食\tた.べる\tショク\r\n").unwrap();
        assert_eq!(row.key, "食");
        assert_eq!(row.readings, vec!["た.べる", "ショク"]);
        assert!(parse_row("").is_none());
        assert!(parse_row("  \t").is_none());
        assert_eq!(parse_row("字").unwrap().readings, Vec::<&str>::new());
    }

    #[test]
    fn reads_furigana_table() {
        let table = "漢\tかん\n\n字\tじ\t \tあざ\n";
        let mut dictionary = Dictionary::new();
        let rows = read_furigana(table.as_bytes(), &mut dictionary).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.lookup_readings("字").unwrap().len(), 2);
        assert_eq!(dictionary.longest_reading_length("字"), 2);
    }

    #[test]
    fn reads_jukujikun_table() {
        let table = "下手\tへた\t\n今日\tきょう\tこんにち\n";
        let mut trie = JukujikunTrie::new();
        let rows = read_jukujikun(table.as_bytes(), &mut trie).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.lookup("下手").unwrap(), ["へた"]);
    }

    #[test]
    fn reads_json_tables() {
        let furigana = r#"{"食": {"た": "べる", "ショク": ""}, "空": {"": ""}}"#;
        let mut dictionary = Dictionary::new();
        let rows = read_furigana_json(furigana.as_bytes(), &mut dictionary).unwrap();
        assert_eq!(rows, 2);
        assert!(!dictionary.contains_key("空"));
        let readings = dictionary.lookup_readings("食").unwrap();
        assert_eq!(readings.get("た").map(String::as_str), Some("べる"));
        assert!(readings.contains_key("しょく"));
        assert_eq!(dictionary.longest_reading_length("食"), 3);

        let jukujikun = r#"{"大人": ["おとな"], "下手": ["へた", "したて"]}"#;
        let mut trie = JukujikunTrie::new();
        read_jukujikun_json(jukujikun.as_bytes(), &mut trie).unwrap();
        assert_eq!(trie.lookup("下手").unwrap(), ["へた", "したて"]);
    }

    #[test]
    fn rejects_invalid_json() {
        let mut dictionary = Dictionary::new();
        let err = read_furigana_json("[1, 2]".as_bytes(), &mut dictionary).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
