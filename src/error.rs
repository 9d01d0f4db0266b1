use thiserror::Error;

/// Board geometry did not match the configured grid layout.
///
/// Always fatal for the whole pass: it means the layout constants are wrong
/// for the corpus, so every later level would decode with bogus dimensions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Row {row} yielded {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Failure while turning one level's inputs into a record.
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("Failed to read board image '{path}': {reason}")]
    Image { path: String, reason: String },

    #[error("Failed to read word list '{path}': {reason}")]
    Words { path: String, reason: String },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl LevelError {
    /// True when the error must abort the pass instead of skipping the level.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LevelError::Geometry(_))
    }
}
