//! Per-category mean files.
//!
//! Layout: a header row of column names followed by one row of means with
//! three decimals. A category without columns produces an empty file.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{means_filename, StorageError};
use crate::calculate::AggregateRow;

/// Write `row` to `dir/{category}_mean.csv`, replacing any existing file.
pub fn write_means(dir: &Path, row: &AggregateRow) -> Result<PathBuf, StorageError> {
    let path = dir.join(means_filename(row.category));
    let mut writer = csv::Writer::from_path(&path)?;

    let formatted = row.formatted();
    if !formatted.is_empty() {
        writer.write_record(formatted.iter().map(|(name, _)| name.as_str()))?;
        writer.write_record(formatted.iter().map(|(_, mean)| mean.as_str()))?;
    }
    writer.flush()?;

    debug!(
        "Wrote {} means over {} observations to {:?}",
        formatted.len(),
        row.observations,
        path
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::aggregate;
    use crate::models::{StatCategory, StatTable};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_write_means_single_row() {
        let temp_dir = TempDir::new().unwrap();
        let mut table = StatTable::new();
        table.push_row([("score", Some(100.0)), ("goals", Some(1.0))]);
        table.push_row([("score", Some(50.0)), ("goals", Some(2.0))]);
        let row = aggregate(StatCategory::Core, &table);

        let path = write_means(temp_dir.path(), &row).unwrap();

        assert!(path.ends_with("core_mean.csv"));
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "score,goals\n75.000,1.500\n");
    }

    #[test]
    fn test_write_means_nan_column() {
        let temp_dir = TempDir::new().unwrap();
        let mut table = StatTable::new();
        table.push_row([("a", Some(1.0)), ("b", None)]);
        let row = aggregate(StatCategory::Positioning, &table);

        let path = write_means(temp_dir.path(), &row).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "a,b\n1.000,NaN\n");
    }

    #[test]
    fn test_write_means_empty_table() {
        let temp_dir = TempDir::new().unwrap();
        let row = aggregate(StatCategory::Demo, &StatTable::new());

        let path = write_means(temp_dir.path(), &row).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_write_means_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mut table = StatTable::new();
        table.push_row([("bpm", Some(400.0))]);
        let row = aggregate(StatCategory::Boost, &table);

        write_means(temp_dir.path(), &row).unwrap();
        let path = write_means(temp_dir.path(), &row).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "bpm\n400.000\n");
    }
}
