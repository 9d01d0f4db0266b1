//! Wordscapes Grid Dataset Tool
//!
//! Decodes per-level board images into canonical grid records, writes them to
//! a single dataset file, and counts levels that share a grid shape.

mod board;
mod config;
mod dataset;
mod error;
mod fingerprint;
mod paths;
mod pipeline;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::dataset::{Dataset, LevelRecord, WordList};
use crate::fingerprint::{export_report, tally_dataset, unique_letters, CollisionReport};

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("wordscapes_grid.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

#[derive(Parser)]
#[command(name = "wordscapes-grid")]
#[command(about = "Decode puzzle board images into grid records and find duplicate shapes")]
#[command(version)]
struct Cli {
    /// Path to config.json (defaults to ./config.json, then next to the executable).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Defaults to `process` over the configured level range.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every level in range, write the dataset and report collisions (default).
    Process {
        /// First level (defaults to config first_level).
        #[arg(long)]
        from: Option<usize>,

        /// Last level, inclusive (defaults to config last_level).
        #[arg(long)]
        to: Option<usize>,

        /// Write the collision report as JSON.
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Count collisions in an existing dataset.
    Collisions {
        /// Dataset file (defaults to config dataset_path).
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Write the collision report as JSON.
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Decode a single board image and print its record line.
    Decode {
        /// Board image.
        #[arg(long)]
        image: PathBuf,

        /// Word list to attach to the record.
        #[arg(long)]
        words: Option<PathBuf>,
    },

    /// Print the letters used by one level's words.
    Letters {
        /// Level index (line number in the dataset).
        #[arg(long)]
        level: usize,

        /// Dataset file (defaults to config dataset_path).
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    let cli = Cli::parse();

    config::init_config(cli.config.as_deref());
    let config = config::get_config();

    paths::ensure_directories(config.debug_dir.as_deref())?;

    let command = cli.command.unwrap_or(Commands::Process {
        from: None,
        to: None,
        report: None,
    });

    match command {
        Commands::Process { from, to, report } => {
            let first = from.unwrap_or(config.first_level);
            let last = to.unwrap_or(config.last_level);
            if first > last {
                return Err(anyhow!("Empty level range: {}..={}", first, last));
            }

            log(&format!("Processing levels {}..={}", first, last));
            let summary = pipeline::process_levels(config, first..=last)?;
            print_collisions(&summary, report)
        }
        Commands::Collisions { dataset, report } => {
            let path = dataset.unwrap_or_else(|| config.dataset_path.clone());
            let data = Dataset::from_file(&path)?;
            if data.is_empty() {
                log(&format!("Warning: No records in {}", path.display()));
            }
            log(&format!("Loaded {} records from {}", data.len(), path.display()));

            let summary = tally_dataset(&data).report();
            print_collisions(&summary, report)
        }
        Commands::Decode { image, words } => {
            let img = image::open(&image)
                .context(format!("Failed to open board image: {}", image.display()))?
                .to_luma8();
            let words = match words {
                Some(path) => WordList::load(&path)?,
                None => WordList::default(),
            };

            let decoded = board::decode_board(&img, config)?;
            let record = LevelRecord::new(0, &decoded.grid, words);
            println!("{}", record);
            Ok(())
        }
        Commands::Letters { level, dataset } => {
            let path = dataset.unwrap_or_else(|| config.dataset_path.clone());
            let data = Dataset::from_file(&path)?;
            let record = data
                .level(level)
                .ok_or_else(|| anyhow!("Level {} not found in {}", level, path.display()))?;

            println!("{}", unique_letters(record.words.words.as_slice()));
            Ok(())
        }
    }
}

/// Prints the collision count and optionally saves the full report.
fn print_collisions(summary: &CollisionReport, report: Option<PathBuf>) -> Result<()> {
    println!("Collisions: {}", summary.collisions);
    log(&format!(
        "{} records, {} unique shapes, {} collisions",
        summary.total_records, summary.unique_shapes, summary.collisions
    ));

    if let Some(path) = report {
        export_report(summary, &path)?;
        log(&format!("Collision report saved: {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_runs_process() {
        let cli = Cli::try_parse_from(["wordscapes-grid"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_process_range_arguments() {
        let cli = Cli::try_parse_from(["wordscapes-grid", "process", "--from", "2", "--to", "9"])
            .unwrap();
        match cli.command {
            Some(Commands::Process { from, to, report }) => {
                assert_eq!(from, Some(2));
                assert_eq!(to, Some(9));
                assert!(report.is_none());
            }
            _ => panic!("expected process command"),
        }
    }
}
