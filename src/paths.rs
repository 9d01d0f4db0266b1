use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the debug mask path for a level inside `debug_dir`.
pub fn debug_mask_path(debug_dir: &Path, level: usize) -> PathBuf {
    debug_dir.join(format!("level_{}_mask.png", level))
}

/// Ensures the log directory and the optional debug directory exist. Call at startup.
pub fn ensure_directories(debug_dir: Option<&Path>) -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    if let Some(dir) = debug_dir {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
