//! Duplicate grid shape detection.
//!
//! Tracks the first level that produced each fingerprint and counts every later
//! record that hashes to an already-seen value. Records are never dropped.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::hash::fingerprint;

/// One record whose fingerprint was already registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    /// Level of the colliding record
    pub level: usize,
    /// Level that first produced the fingerprint
    pub first_level: usize,
    pub fingerprint: u32,
}

/// Running collision count for one pass over the dataset.
#[derive(Debug, Clone, Default)]
pub struct CollisionTally {
    first_seen: BTreeMap<u32, usize>,
    records: usize,
    collisions: Vec<Collision>,
}

impl CollisionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `bits` and registers it for `level`.
    ///
    /// Returns the first level with the same fingerprint on a hit, `None` when
    /// the fingerprint is new.
    pub fn observe(&mut self, level: usize, bits: &str) -> Option<usize> {
        let hash = fingerprint(bits);
        self.records += 1;

        match self.first_seen.get(&hash) {
            Some(&first_level) => {
                self.collisions.push(Collision {
                    level,
                    first_level,
                    fingerprint: hash,
                });
                Some(first_level)
            }
            None => {
                self.first_seen.insert(hash, level);
                None
            }
        }
    }

    /// Number of records that matched an earlier fingerprint.
    pub fn collision_count(&self) -> usize {
        self.collisions.len()
    }

    pub fn report(&self) -> CollisionReport {
        CollisionReport {
            total_records: self.records,
            unique_shapes: self.first_seen.len(),
            collisions: self.collisions.len(),
            duplicates: self.collisions.clone(),
        }
    }
}

/// Summary of a collision pass.
#[derive(Debug, Clone, Serialize)]
pub struct CollisionReport {
    pub total_records: usize,
    pub unique_shapes: usize,
    pub collisions: usize,
    pub duplicates: Vec<Collision>,
}

/// Export a collision report to a pretty-printed JSON file.
pub fn export_report(report: &CollisionReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize collision report to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}
