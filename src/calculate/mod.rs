//! Mean aggregation over collected statistic tables.
//!
//! Every category yields one row of column-wise arithmetic means. Cells
//! without a value are skipped; a column with no values at all has no mean.

use crate::models::{CategoryTables, StatCategory, StatTable};

/// Column-wise means for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub category: StatCategory,

    /// Rows the means were computed over
    pub observations: usize,

    /// `(column, mean)` in table column order
    pub means: Vec<(String, Option<f64>)>,
}

impl AggregateRow {
    /// Mean of a named column, if the column exists and has values.
    pub fn mean(&self, column: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, mean)| *mean)
    }

    /// Column names and three-decimal mean strings.
    pub fn formatted(&self) -> Vec<(String, String)> {
        self.means
            .iter()
            .map(|(name, mean)| (name.clone(), format_mean(*mean)))
            .collect()
    }
}

/// Arithmetic mean, or `None` for an empty input.
pub fn calculate_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Render a mean with three decimals; a missing mean renders as `NaN`.
pub fn format_mean(mean: Option<f64>) -> String {
    match mean {
        Some(v) => format!("{:.3}", v),
        None => "NaN".to_string(),
    }
}

/// Means of every column of one table.
pub fn aggregate(category: StatCategory, table: &StatTable) -> AggregateRow {
    let means = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), calculate_mean(table.column_values(idx))))
        .collect();

    AggregateRow {
        category,
        observations: table.row_count(),
        means,
    }
}

/// One row per category, in category order. Categories that never
/// appeared produce an empty row.
pub fn aggregate_all(tables: &CategoryTables) -> Vec<AggregateRow> {
    let empty = StatTable::new();
    StatCategory::ALL
        .iter()
        .map(|&category| aggregate(category, tables.get(category).unwrap_or(&empty)))
        .collect()
}
