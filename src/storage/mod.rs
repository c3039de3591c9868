//! Output files.
//!
//! Each run writes into its own directory under the output root:
//! - `{category}_mean.csv`, one per stat category
//! - `replays.json`, the raw search results (debug runs only)

mod means;

pub use means::write_means;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::{DateWindow, Rank, StatCategory};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration for output paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub output_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Directory for one query: `{Rank}-{from}-{to}`.
    pub fn run_dir(&self, rank: Rank, window: &DateWindow) -> PathBuf {
        self.output_dir.join(format!(
            "{}-{}-{}",
            rank.label(),
            window.from_date().format("%Y-%m-%d"),
            window.to_date().format("%Y-%m-%d")
        ))
    }

    /// Create the run directory if needed and return it.
    pub fn ensure_run_dir(&self, rank: Rank, window: &DateWindow) -> Result<PathBuf, StorageError> {
        let dir = self.run_dir(rank, window);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

/// File name of a category's mean file.
pub fn means_filename(category: StatCategory) -> String {
    format!("{}_mean.csv", category.key())
}

/// File name of the debug dump of raw search results.
pub const DEBUG_REPLAYS_FILENAME: &str = "replays.json";

/// Write `items` as pretty-printed JSON to `dir/replays.json`.
pub fn write_debug_replays<T: Serialize>(dir: &Path, items: &[T]) -> Result<PathBuf, StorageError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(DEBUG_REPLAYS_FILENAME);

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, items)?;
    writer.flush()?;

    info!("Wrote {} raw search results to {:?}", items.len(), path);
    Ok(path)
}
