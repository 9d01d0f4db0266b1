//! Dataset artifact writer.
//!
//! The whole artifact is written once, after a successful pass, through a
//! temporary file in the target directory so a crash or an aborted pass never
//! leaves a partial dataset behind.

use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use super::record::LevelRecord;

/// Writes all records, one per line, each terminated by `\n`.
pub fn write_dataset(path: &Path, records: &[LevelRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .context(format!("Failed to create dataset directory: {}", dir.display()))?;

    let temp = NamedTempFile::new_in(dir).context("Failed to create temporary dataset file")?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        for record in records {
            writeln!(writer, "{}", record).context("Failed to write dataset record")?;
        }
        writer.flush().context("Failed to flush dataset")?;
    }

    temp.persist(path)
        .context(format!("Failed to save dataset: {}", path.display()))?;
    Ok(())
}
