//! Shape fingerprints and duplicate detection.
//!
//! This module provides:
//! - The base-37 positional hash over occupancy bitstrings
//! - A collision tally keyed by fingerprint
//! - JSON export of the collision report
//! - The unique-letter summary of a word list

pub mod collisions;
pub mod hash;
pub mod letters;

pub use collisions::{export_report, CollisionReport, CollisionTally};
pub use letters::unique_letters;

use crate::dataset::Dataset;

/// Runs the tally over every record of a loaded dataset, in file order.
pub fn tally_dataset(dataset: &Dataset) -> CollisionTally {
    let mut tally = CollisionTally::new();
    for record in &dataset.records {
        tally.observe(record.level, &record.bits);
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::hash::fingerprint;
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_tally_dataset() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "2 2 0011\tA\n2 2 0011\tB\n2 2 1100\tC\n2 2 0011\tD\n"
        )
        .unwrap();

        let dataset = Dataset::from_file(file.path()).unwrap();
        let tally = tally_dataset(&dataset);

        assert_eq!(tally.collision_count(), 2);
        let duplicates = tally.report().duplicates;
        assert_eq!(duplicates[1].level, 4);
        assert_eq!(duplicates[1].fingerprint, fingerprint("0011"));
    }
}
