//! Dataset pass: decode every level in order, then write the dataset and
//! report collisions.
//!
//! Missing or unreadable inputs skip their level. A geometry mismatch aborts the
//! whole pass before anything is written.

use anyhow::Result;
use std::ops::RangeInclusive;

use crate::board::decode_board;
use crate::config::PipelineConfig;
use crate::dataset::{write_dataset, LevelRecord, WordList};
use crate::error::LevelError;
use crate::fingerprint::{CollisionReport, CollisionTally};

/// State accumulated over one pass.
#[derive(Debug, Default)]
pub struct PassContext {
    /// Records of successfully decoded levels, in level order
    pub records: Vec<LevelRecord>,
    pub tally: CollisionTally,
    /// Levels excluded because their inputs could not be read
    pub skipped: Vec<usize>,
}

impl PassContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decodes one level's image and word list into a record.
pub fn decode_level(level: usize, config: &PipelineConfig) -> Result<LevelRecord, LevelError> {
    let image_path = config.image_path(level);
    let image = image::open(&image_path)
        .map_err(|e| LevelError::Image {
            path: image_path.display().to_string(),
            reason: e.to_string(),
        })?
        .to_luma8();

    let words_path = config.words_path(level);
    let words = WordList::load(&words_path).map_err(|e| LevelError::Words {
        path: words_path.display().to_string(),
        reason: format!("{:#}", e),
    })?;
    if words.is_empty() {
        crate::log(&format!("Warning: Level {} has an empty word list", level));
    }

    let decoded = decode_board(&image, config)?;

    if let Some(dir) = &config.debug_dir {
        let debug_path = crate::paths::debug_mask_path(dir, level);
        if let Err(e) = decoded.mask.save(&debug_path) {
            crate::log(&format!(
                "Warning: Failed to save debug mask {}: {}",
                debug_path.display(),
                e
            ));
        }
    }

    crate::log(&format!(
        "Level {}: {} cells in {} rows -> {}x{} grid",
        level,
        decoded.detected_cells,
        decoded.detected_rows,
        decoded.grid.width(),
        decoded.grid.height()
    ));

    Ok(LevelRecord::new(level, &decoded.grid, words))
}

/// Decodes every level in `levels`, in increasing order, into `ctx`.
///
/// Returns an error on the first geometry mismatch; levels after it are never
/// attempted.
pub fn run_pass(
    config: &PipelineConfig,
    levels: RangeInclusive<usize>,
    ctx: &mut PassContext,
) -> Result<()> {
    for level in levels {
        match decode_level(level, config) {
            Ok(record) => {
                if let Some(first) = ctx.tally.observe(level, &record.bits) {
                    crate::log(&format!(
                        "Level {} shares its fingerprint with level {}",
                        level, first
                    ));
                }
                crate::log(&format!("Processed level {}: {}", level, record));
                ctx.records.push(record);
            }
            Err(e) if e.is_fatal() => {
                crate::log(&format!("CRITICAL: Level {}: {}. Aborting pass.", level, e));
                return Err(anyhow::Error::new(e)
                    .context(format!("Invalid grid geometry in level {}", level)));
            }
            Err(e) => {
                crate::log(&format!("Skipping level {}: {}", level, e));
                ctx.skipped.push(level);
            }
        }
    }

    Ok(())
}

/// Runs a full pass over `levels` and writes the dataset.
///
/// The dataset is only written when every level either decoded or was skipped.
pub fn process_levels(
    config: &PipelineConfig,
    levels: RangeInclusive<usize>,
) -> Result<CollisionReport> {
    let mut ctx = PassContext::new();
    run_pass(config, levels, &mut ctx)?;

    write_dataset(&config.dataset_path, &ctx.records)?;
    crate::log(&format!(
        "Dataset saved: {} ({} records, {} skipped, {} collisions)",
        config.dataset_path.display(),
        ctx.records.len(),
        ctx.skipped.len(),
        ctx.tally.collision_count()
    ));

    Ok(ctx.tally.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::test_boards::draw_board;
    use crate::dataset::Dataset;
    use crate::fingerprint::tally_dataset;
    use image::GrayImage;
    use std::path::Path;
    use tempfile::tempdir;

    fn test_config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            data_dir: root.join("data"),
            image_file: "image.png".to_string(),
            dataset_path: root.join("data.txt"),
            ..PipelineConfig::default()
        }
    }

    fn write_level(config: &PipelineConfig, level: usize, width: u32, words: &str) {
        std::fs::create_dir_all(config.level_dir(level)).unwrap();
        let img = draw_board(width, 186, 3, 3, |_, _| true);
        img.save(config.image_path(level)).unwrap();
        std::fs::write(config.words_path(level), words).unwrap();
    }

    #[test]
    fn test_decode_level() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        write_level(&config, 1, 186, "CAT\nDOG\n");

        let record = decode_level(1, &config).unwrap();

        assert_eq!(record.to_string(), "3 3 111111111\tCAT DOG");
    }

    #[test]
    fn test_decode_level_missing_image() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        let err = decode_level(1, &config).unwrap_err();
        assert!(matches!(err, LevelError::Image { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_decode_level_missing_words() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        write_level(&config, 1, 186, "");
        std::fs::remove_file(config.words_path(1)).unwrap();

        let err = decode_level(1, &config).unwrap_err();
        assert!(matches!(err, LevelError::Words { .. }));
    }

    #[test]
    fn test_pass_skips_missing_levels() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        write_level(&config, 1, 186, "CAT DOG");
        write_level(&config, 3, 186, "ACT");

        let report = process_levels(&config, 1..=3).unwrap();

        let content = std::fs::read_to_string(&config.dataset_path).unwrap();
        assert_eq!(content, "3 3 111111111\tCAT DOG\n3 3 111111111\tACT\n");
        assert_eq!(report.total_records, 2);
        assert_eq!(report.collisions, 1);
        assert_eq!(report.duplicates[0].level, 3);
        assert_eq!(report.duplicates[0].first_level, 1);
    }

    #[test]
    fn test_pass_records_skipped_levels() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        write_level(&config, 2, 186, "CAT");

        let mut ctx = PassContext::new();
        run_pass(&config, 1..=3, &mut ctx).unwrap();

        assert_eq!(ctx.skipped, vec![1, 3]);
        assert_eq!(ctx.records.len(), 1);
        assert_eq!(ctx.records[0].level, 2);
    }

    #[test]
    fn test_geometry_mismatch_aborts_pass() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        write_level(&config, 1, 186, "CAT");
        write_level(&config, 2, 156, "DOG");
        write_level(&config, 3, 186, "ACT");

        let mut ctx = PassContext::new();
        let result = run_pass(&config, 1..=3, &mut ctx);

        assert!(result.is_err());
        // Level 3 would have decoded had the pass continued
        assert_eq!(ctx.records.len(), 1);
        assert_eq!(ctx.records[0].level, 1);
        assert!(ctx.skipped.is_empty());
    }

    #[test]
    fn test_geometry_mismatch_writes_nothing() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        write_level(&config, 1, 186, "CAT");
        write_level(&config, 2, 156, "DOG");

        assert!(process_levels(&config, 1..=2).is_err());
        assert!(!config.dataset_path.exists());
    }

    #[test]
    fn test_pass_output_reloads() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        write_level(&config, 1, 186, "CAT");
        write_level(&config, 2, 186, "DOG");

        process_levels(&config, 1..=2).unwrap();
        let dataset = Dataset::from_file(&config.dataset_path).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[1].words.words, vec!["DOG"]);
    }

    #[test]
    fn test_zero_width_boards_reload() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        for level in 1..=2 {
            std::fs::create_dir_all(config.level_dir(level)).unwrap();
            GrayImage::new(20, 200).save(config.image_path(level)).unwrap();
            std::fs::write(config.words_path(level), "CAT").unwrap();
        }

        let report = process_levels(&config, 1..=2).unwrap();
        let content = std::fs::read_to_string(&config.dataset_path).unwrap();
        assert_eq!(content, "0 3 \tCAT\n0 3 \tCAT\n");
        assert_eq!(report.collisions, 1);

        let dataset = Dataset::from_file(&config.dataset_path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(tally_dataset(&dataset).collision_count(), 1);
    }

    #[test]
    fn test_debug_mask_saved() {
        let dir = tempdir().unwrap();
        let mut config = test_config(dir.path());
        let debug_dir = dir.path().join("debug");
        std::fs::create_dir_all(&debug_dir).unwrap();
        config.debug_dir = Some(debug_dir.clone());
        write_level(&config, 1, 186, "CAT");

        decode_level(1, &config).unwrap();

        assert!(crate::paths::debug_mask_path(&debug_dir, 1).exists());
    }
}
