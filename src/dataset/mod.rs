//! Level records and the dataset artifact.
//!
//! This module provides:
//! - Word list loading and the canonical record line
//! - Atomic writing of the dataset after a successful pass
//! - Reading an existing dataset back for collision checks

pub mod reader;
pub mod record;
pub mod writer;

pub use reader::Dataset;
pub use record::{LevelRecord, WordList};
pub use writer::write_dataset;
