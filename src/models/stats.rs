//! Per-player statistic tables.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Named group of per-player statistics reported for every replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCategory {
    Core,
    Boost,
    Movement,
    Positioning,
    Demo,
}

impl StatCategory {
    pub const ALL: [StatCategory; 5] = [
        StatCategory::Core,
        StatCategory::Boost,
        StatCategory::Movement,
        StatCategory::Positioning,
        StatCategory::Demo,
    ];

    /// Parse the key used in the provider's `stats` object.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "core" => Some(StatCategory::Core),
            "boost" => Some(StatCategory::Boost),
            "movement" => Some(StatCategory::Movement),
            "positioning" => Some(StatCategory::Positioning),
            "demo" => Some(StatCategory::Demo),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            StatCategory::Core => "core",
            StatCategory::Boost => "boost",
            StatCategory::Movement => "movement",
            StatCategory::Positioning => "positioning",
            StatCategory::Demo => "demo",
        }
    }

    /// Fields reported under this category that are not statistics.
    pub fn excluded_fields(&self) -> &'static [&'static str] {
        match self {
            StatCategory::Core => &["mvp"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for StatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Growable table of observations, one row per (player, replay).
///
/// Columns are ordered by first sight. A row recorded before a column
/// existed, or that never reported it, has no value in that column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<f64>>>,
}

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn column_index(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.columns.len();
        self.columns.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Append one observation. `None` marks a field that was reported
    /// without a numeric value.
    pub fn push_row<I, K>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, Option<f64>)>,
        K: AsRef<str>,
    {
        let mut row: Vec<Option<f64>> = vec![None; self.columns.len()];
        for (name, value) in fields {
            let idx = self.column_index(name.as_ref());
            if idx >= row.len() {
                row.resize(idx + 1, None);
            }
            row[idx] = value;
        }
        self.rows.push(row);
    }

    /// Value of `column` in row `row`, if present.
    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .flatten()
    }

    /// Present values of one column, in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows
            .iter()
            .filter_map(move |r| r.get(column).copied().flatten())
    }

    /// Move every row of `other` to the end of this table.
    pub fn append(&mut self, other: StatTable) {
        let StatTable { columns, rows, .. } = other;
        for row in rows {
            self.push_row(
                columns
                    .iter()
                    .zip(row.into_iter().chain(std::iter::repeat(None)))
                    .map(|(name, value)| (name.as_str(), value)),
            );
        }
    }
}

/// One [`StatTable`] per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTables {
    tables: BTreeMap<StatCategory, StatTable>,
}

impl CategoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: StatCategory) -> Option<&StatTable> {
        self.tables.get(&category)
    }

    pub fn table_mut(&mut self, category: StatCategory) -> &mut StatTable {
        self.tables.entry(category).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StatCategory, &StatTable)> {
        self.tables.iter()
    }

    /// Total observations across all categories.
    pub fn total_rows(&self) -> usize {
        self.tables.values().map(StatTable::row_count).sum()
    }

    /// Fold another replay's tables into this one.
    pub fn merge(&mut self, other: CategoryTables) {
        for (category, table) in other.tables {
            self.table_mut(category).append(table);
        }
    }
}

/// Merge per-replay results into one set of tables, in the order given.
pub fn merge_tables<I>(results: I) -> CategoryTables
where
    I: IntoIterator<Item = CategoryTables>,
{
    let mut merged = CategoryTables::new();
    for tables in results {
        merged.merge(tables);
    }
    merged
}
