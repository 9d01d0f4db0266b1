//! Reader for an existing dataset artifact.
//!
//! Lets collisions be re-counted without decoding the board images again.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::record::LevelRecord;

/// All records loaded from a dataset file.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<LevelRecord>,
}

impl Dataset {
    /// Load records from a dataset file.
    ///
    /// The level of each record is its 1-based line position. Empty lines are
    /// skipped; malformed lines are skipped with a warning log and still
    /// consume a level index.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open dataset: {}", path.display()))?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from dataset")?;

            if line.trim().is_empty() {
                continue;
            }

            match LevelRecord::parse_line(line_num + 1, &line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    crate::log(&format!(
                        "Warning: Skipping malformed dataset line {}: {}",
                        line_num + 1,
                        e
                    ));
                }
            }
        }

        Ok(Dataset { records })
    }

    /// Record for a given level, if it decoded.
    pub fn level(&self, level: usize) -> Option<&LevelRecord> {
        self.records.iter().find(|r| r.level == level)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
