//! Pipeline configuration.
//!
//! Loads settings from config.json at startup. Provides input/output locations,
//! the level range, and the grid layout constants the decoder is tuned against.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<PipelineConfig> = OnceLock::new();

/// Complete pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory holding `levels/level_<i>/`
    pub data_dir: PathBuf,
    /// Board image file name inside each level directory
    pub image_file: String,
    /// Word list file name inside each level directory
    pub words_file: String,
    /// Output dataset, one record per line
    pub dataset_path: PathBuf,
    /// First level index of the pass (inclusive)
    pub first_level: usize,
    /// Last level index of the pass (inclusive)
    pub last_level: usize,
    /// Gray value of the drawn cell borders
    pub grid_gray: u8,
    /// Relative tolerance around `grid_gray` (0.1 = ±10%)
    pub band_tolerance: f32,
    /// Smallest accepted width/height ratio for a cell box
    pub aspect_min: f64,
    /// Largest accepted width/height ratio for a cell box
    pub aspect_max: f64,
    /// Vertical bucket size (pixels) used to group boxes into rows
    pub row_tolerance: u32,
    /// Cell pitch in pixels
    pub cell_size: u32,
    /// Gap between neighbouring cells in pixels
    pub cell_gap: u32,
    /// Offset past the cell midpoint for the very first sample
    pub first_anchor: u32,
    /// Offset past the cell midpoint where each later row restarts
    pub row_anchor: u32,
    /// Side of the square flipped after each sample (debug marker)
    pub marker_size: u32,
    /// When set, visited masks are saved here as PNG
    pub debug_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            image_file: "image.jpg".to_string(),
            words_file: "words.txt".to_string(),
            dataset_path: PathBuf::from("data.txt"),
            first_level: 1,
            last_level: 6000,
            grid_gray: 203,
            band_tolerance: 0.1,
            aspect_min: 0.99,
            aspect_max: 1.01,
            row_tolerance: 20,
            cell_size: 60,
            cell_gap: 2,
            first_anchor: 1,
            row_anchor: 2,
            marker_size: 5,
            debug_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Distance between two neighbouring sample points.
    pub fn stride(&self) -> u32 {
        self.cell_size.saturating_add(self.cell_gap)
    }

    /// Checks that the layout constants give a sampler that advances.
    pub fn validate(&self) -> Result<()> {
        let stride = self
            .cell_size
            .checked_add(self.cell_gap)
            .ok_or_else(|| anyhow!("cell_size + cell_gap overflows"))?;
        if stride == 0 {
            return Err(anyhow!("cell_size + cell_gap must be greater than 0"));
        }

        let half = self.cell_size / 2;
        for anchor in [self.first_anchor, self.row_anchor] {
            if half.checked_add(anchor).is_none() {
                return Err(anyhow!("Anchor offset {} overflows", anchor));
            }
        }
        Ok(())
    }

    /// Directory holding one level's inputs.
    pub fn level_dir(&self, level: usize) -> PathBuf {
        self.data_dir.join("levels").join(format!("level_{}", level))
    }

    /// Board image path for a level.
    pub fn image_path(&self, level: usize) -> PathBuf {
        self.level_dir(level).join(&self.image_file)
    }

    /// Word list path for a level.
    pub fn words_path(&self, level: usize) -> PathBuf {
        self.level_dir(level).join(&self.words_file)
    }

    /// Load config from file, or return defaults if it is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        crate::log(&format!("Looking for config at: {}", config_path.display()));

        if !config_path.exists() {
            crate::log("Config file not found. Using default config.");
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        crate::log(&format!("Config loaded from {}", config_path.display()));
                        config
                    }
                    Err(e) => {
                        crate::log(&format!(
                            "Invalid layout in {}: {}. Using defaults.",
                            config_path.display(),
                            e
                        ));
                        Self::default()
                    }
                },
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    ));
                    Self::default()
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read {}: {}. Using defaults.",
                    config_path.display(),
                    e
                ));
                Self::default()
            }
        }
    }
}

/// Finds config.json in the working directory, then next to the executable.
fn default_config_path() -> PathBuf {
    let local = PathBuf::from("config.json");
    if local.exists() {
        return local;
    }
    crate::paths::get_exe_dir().join("config.json")
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config(path: Option<&Path>) {
    let config = match path {
        Some(p) => PipelineConfig::load(p),
        None => PipelineConfig::load(&default_config_path()),
    };
    let _ = CONFIG.set(config);
}

/// Returns a reference to the global configuration.
/// Panics if called before init_config().
pub fn get_config() -> &'static PipelineConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.stride(), 62);
        assert_eq!(config.cell_size / 2 + config.first_anchor, 31);
        assert_eq!(config.cell_size / 2 + config.row_anchor, 32);
    }

    #[test]
    fn test_level_paths() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.image_path(12),
            PathBuf::from("data/levels/level_12/image.jpg")
        );
        assert_eq!(
            config.words_path(12),
            PathBuf::from("data/levels/level_12/words.txt")
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "cell_size": 48, "last_level": 10 }}"#).unwrap();

        let config = PipelineConfig::load(file.path());

        assert_eq!(config.cell_size, 48);
        assert_eq!(config.last_level, 10);
        assert_eq!(config.grid_gray, 203);
        assert_eq!(config.row_tolerance, 20);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let config = PipelineConfig::load(file.path());
        assert_eq!(config.cell_size, 60);
    }

    #[test]
    fn test_zero_stride_config_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "cell_size": 0, "cell_gap": 0, "last_level": 10 }}"#).unwrap();

        let config = PipelineConfig::load(file.path());
        assert_eq!(config.stride(), 62);
        assert_eq!(config.last_level, 6000);
    }

    #[test]
    fn test_validate_layout() {
        assert!(PipelineConfig::default().validate().is_ok());

        let zero = PipelineConfig {
            cell_size: 0,
            cell_gap: 0,
            ..PipelineConfig::default()
        };
        assert!(zero.validate().is_err());

        let overflow = PipelineConfig {
            cell_size: u32::MAX,
            cell_gap: 2,
            ..PipelineConfig::default()
        };
        assert!(overflow.validate().is_err());

        let far_anchor = PipelineConfig {
            row_anchor: u32::MAX,
            ..PipelineConfig::default()
        };
        assert!(far_anchor.validate().is_err());
    }

    #[test]
    fn test_missing_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::load(&dir.path().join("absent.json"));
        assert_eq!(config.first_level, 1);
        assert!(config.debug_dir.is_none());
    }
}
