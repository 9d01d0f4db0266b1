//! Canonical per-level record.
//!
//! One record renders as `"<width> <height> <bits>\t<word1> <word2> ..."`.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::board::GridMatrix;

/// Accepted shape of an answer word.
const WORD_PATTERN: &str = r"^[A-Z]+$";

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WORD_PATTERN).expect("WORD_PATTERN is a valid regex"));

/// A level's answer words, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    pub words: Vec<String>,
}

impl WordList {
    /// Splits `text` on whitespace and keeps every token verbatim.
    pub fn parse(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Reads a word list file.
    ///
    /// Tokens that are not plain uppercase words are logged but kept.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .context(format!("Failed to read word list: {}", path.display()))?;
        let list = Self::parse(&text);

        for word in list.words.iter().filter(|w| !WORD_REGEX.is_match(w)) {
            crate::log(&format!(
                "Warning: Unexpected word '{}' in {}",
                word,
                path.display()
            ));
        }

        Ok(list)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Display for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words.join(" "))
    }
}

/// Decoded level: grid dimensions, occupancy bits and answer words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRecord {
    /// Level index this record was produced from
    pub level: usize,
    pub width: usize,
    pub height: usize,
    /// Row-major `'1'`/`'0'` occupancy
    pub bits: String,
    pub words: WordList,
}

impl LevelRecord {
    /// Builds a record from a decoded grid.
    pub fn new(level: usize, grid: &GridMatrix, words: WordList) -> Self {
        Self {
            level,
            width: grid.width(),
            height: grid.height(),
            bits: grid.bitstring(),
            words,
        }
    }

    /// Parses one dataset line back into a record.
    ///
    /// Layout fields are separated by single spaces, so a zero-area grid
    /// (`"0 3 "`) keeps its empty bitstring field.
    pub fn parse_line(level: usize, line: &str) -> Result<Self> {
        let (layout, words) = line
            .split_once('\t')
            .ok_or_else(|| anyhow!("Missing tab between layout and words"))?;

        let parts: Vec<&str> = layout.splitn(3, ' ').collect();
        if parts.len() != 3 {
            return Err(anyhow!("Expected 3 layout fields, got {}", parts.len()));
        }

        let width = parts[0].parse::<usize>().context("Invalid width")?;
        let height = parts[1].parse::<usize>().context("Invalid height")?;
        let bits = parts[2].to_string();

        if bits.len() != width * height {
            return Err(anyhow!(
                "Bitstring has {} cells, expected {}x{}",
                bits.len(),
                width,
                height
            ));
        }
        if let Some(c) = bits.chars().find(|&c| c != '0' && c != '1') {
            return Err(anyhow!("Invalid occupancy character '{}'", c));
        }

        Ok(Self {
            level,
            width,
            height,
            bits,
            words: WordList::parse(words),
        })
    }
}

impl fmt::Display for LevelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}\t{}", self.width, self.height, self.bits, self.words)
    }
}
