//! Column statistics and per-dtype feature counts

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Serialize, Serializer};

use crate::pipeline::table::Table;

/// Statistics for a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStat {
    pub name: String,
    #[serde(serialize_with = "serialize_dtype")]
    pub dtype: DataType,
    /// Nulls in the column, or the full row count for non-informative columns
    pub null_count: usize,
    /// Distinct non-null values, or 0 for non-informative columns
    pub unique_count: usize,
}

impl ColumnStat {
    /// A column with at most one distinct value carries no information
    pub fn is_non_informative(&self) -> bool {
        self.unique_count == 0
    }
}

fn serialize_dtype<S: Serializer>(dtype: &DataType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dtype.to_string())
}

/// Per-column statistics of a table, in column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub row_count: usize,
    pub columns: Vec<ColumnStat>,
}

impl ColumnStatistics {
    /// Compute statistics for every column of the frame.
    ///
    /// Unique counts exclude nulls. Columns with <= 1 distinct value get their unique
    /// count zeroed and their null count forced to the row count so that null pruning
    /// always catches them.
    pub fn compute(df: &DataFrame) -> Result<Self> {
        Self::compute_with_rows(df, df.height())
    }

    /// Statistics for a table, counting rows through its index so that a table with
    /// every data column pruned still reports its real height
    pub fn for_table(table: &Table) -> Result<Self> {
        Self::compute_with_rows(table.frame(), table.height())
    }

    fn compute_with_rows(df: &DataFrame, row_count: usize) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let mut null_count = series.null_count();
            let mut unique_count = series
                .drop_nulls()
                .n_unique()
                .with_context(|| format!("Failed to count unique values of '{}'", column.name()))?;

            if unique_count <= 1 {
                unique_count = 0;
                null_count = row_count;
            }

            columns.push(ColumnStat {
                name: column.name().to_string(),
                dtype: column.dtype().clone(),
                null_count,
                unique_count,
            });
        }

        Ok(Self { row_count, columns })
    }

    pub fn get(&self, name: &str) -> Option<&ColumnStat> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Every row holds a distinct value
    pub fn is_fully_unique(&self, stat: &ColumnStat) -> bool {
        self.row_count > 0 && stat.unique_count == self.row_count
    }

    /// Fully unique, non floating-point columns that could serve as the index
    pub fn index_candidates(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| self.is_fully_unique(c) && !c.dtype.is_float())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Columns whose null count reaches half the row count
    pub fn high_null_columns(&self) -> Vec<&ColumnStat> {
        let limit = self.row_count / 2;
        self.columns
            .iter()
            .filter(|c| c.null_count >= limit)
            .collect()
    }

    /// Null count per column as a fraction of the row count, sorted descending
    pub fn null_fractions(&self) -> Vec<(String, f64)> {
        let mut fractions: Vec<(String, f64)> = self
            .columns
            .iter()
            .map(|c| {
                let fraction = if self.row_count == 0 {
                    0.0
                } else {
                    c.null_count as f64 / self.row_count as f64
                };
                (c.name.clone(), fraction)
            })
            .collect();
        fractions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        fractions
    }

    /// Unique count per column, sorted descending
    pub fn unique_counts_sorted(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.unique_count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

/// One row of the feature counts summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureCountRow {
    pub dtype: String,
    /// Columns with zero nulls, fully unique ones included
    pub without_nulls: usize,
    pub fully_unique: usize,
    /// `total - fully_unique - without_nulls`. Fully unique columns are also null-free,
    /// so this goes negative once a dtype has any.
    pub rest: i64,
    pub total: usize,
}

impl FeatureCountRow {
    fn add(&mut self, other: &FeatureCountRow) {
        self.without_nulls += other.without_nulls;
        self.fully_unique += other.fully_unique;
        self.rest += other.rest;
        self.total += other.total;
    }
}

/// Per-dtype feature counts with a grand total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureCounts {
    pub rows: Vec<FeatureCountRow>,
    pub total: FeatureCountRow,
}

impl FeatureCounts {
    /// Tally columns per dtype
    pub fn from_statistics(stats: &ColumnStatistics) -> Self {
        let mut by_dtype: BTreeMap<String, FeatureCountRow> = BTreeMap::new();

        for stat in &stats.columns {
            let dtype = stat.dtype.to_string();
            let row = by_dtype.entry(dtype.clone()).or_insert_with(|| FeatureCountRow {
                dtype,
                ..Default::default()
            });

            if stats.is_fully_unique(stat) {
                row.fully_unique += 1;
            }
            if stat.null_count == 0 {
                row.without_nulls += 1;
            }
            row.total += 1;
        }

        for row in by_dtype.values_mut() {
            row.rest = row.total as i64 - row.fully_unique as i64 - row.without_nulls as i64;
        }

        // Most common dtype first, like a value count
        let mut rows: Vec<FeatureCountRow> = by_dtype.into_values().collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.dtype.cmp(&b.dtype)));

        let mut total = FeatureCountRow {
            dtype: "Total".to_string(),
            ..Default::default()
        };
        for row in &rows {
            total.add(row);
        }

        Self { rows, total }
    }
}

/// Number of null cells in each row
pub fn row_null_counts(df: &DataFrame) -> Vec<usize> {
    let mut counts = vec![0usize; df.height()];
    for column in df.get_columns() {
        let is_null = column.as_materialized_series().is_null();
        for (count, null) in counts.iter_mut().zip(is_null.into_iter()) {
            if null.unwrap_or(false) {
                *count += 1;
            }
        }
    }
    counts
}
