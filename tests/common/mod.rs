//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use exoscope::pipeline::{DatasetSource, FetchError, Table};
use polars::prelude::*;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// A small planet table shaped like the archive's composite parameters table
///
/// - `pl_name`: unique text identifier (the only index candidate)
/// - `pl_orbper`: float, one null
/// - `sy_snum`: integer, repeats
/// - `st_lum`: dex column, mostly null
/// - `pl_status`: a single repeated value (non-informative)
pub fn create_planet_dataframe() -> DataFrame {
    df! {
        "pl_name" => ["Kepler-22 b", "TRAPPIST-1 e", "51 Peg b", "HD 209458 b", "GJ 1214 b", "WASP-12 b"],
        "pl_orbper" => [Some(289.86f64), Some(6.1), None, Some(3.52), Some(1.58), Some(1.09)],
        "sy_snum" => [1i64, 1, 1, 1, 1, 2],
        "st_lum" => [Some(-0.1f64), None, None, None, None, Some(0.3)],
        "pl_status" => ["confirmed"; 6],
    }
    .unwrap()
}

/// Columns A (unique ints), B (all null), C (one repeated value)
pub fn create_abc_dataframe() -> DataFrame {
    df! {
        "A" => [10i64, 20, 30, 40, 50],
        "B" => [None::<i64>, None, None, None, None],
        "C" => [7i32; 5],
    }
    .unwrap()
}

/// Random integer table with a given null probability per cell
pub fn create_random_dataframe(rows: usize, cols: usize, null_prob: f64, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut columns: Vec<Column> = Vec::with_capacity(cols);

    for i in 0..cols {
        let cardinality = rng.gen_range(1..=rows.max(1) as i64 * 2);
        let values: Vec<Option<i64>> = (0..rows)
            .map(|_| {
                if rng.gen::<f64>() < null_prob {
                    None
                } else {
                    Some(rng.gen_range(0..cardinality))
                }
            })
            .collect();
        columns.push(Column::new(format!("col_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Dataset source returning a fixed frame and counting calls
pub struct MockSource {
    frame: DataFrame,
    calls: Cell<usize>,
    last_table: RefCell<Option<String>>,
}

impl MockSource {
    pub fn new(frame: DataFrame) -> Self {
        Self {
            frame,
            calls: Cell::new(0),
            last_table: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_table(&self) -> Option<String> {
        self.last_table.borrow().clone()
    }
}

impl DatasetSource for MockSource {
    fn fetch(&self, table: &str) -> Result<DataFrame, FetchError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_table.borrow_mut() = Some(table.to_string());
        Ok(self.frame.clone())
    }
}

/// Dataset source that always fails, like an unreachable archive
pub struct FailingSource;

impl DatasetSource for FailingSource {
    fn fetch(&self, table: &str) -> Result<DataFrame, FetchError> {
        Err(FetchError::EmptyResponse(table.to_string()))
    }
}

/// Write `df` as the cache file for `name` inside a fresh project directory
pub fn create_cached_project(df: &mut DataFrame, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let datasets = temp_dir.path().join("datasets");
    std::fs::create_dir_all(&datasets).unwrap();

    let csv_path = datasets.join(format!("{}.csv", name));
    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

pub fn read_csv(path: &Path) -> DataFrame {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .unwrap()
        .finish()
        .unwrap()
}

/// Assert that a table has expected shape
pub fn assert_shape(table: &Table, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = table.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a table contains specific columns
pub fn assert_has_columns(table: &Table, expected_cols: &[&str]) {
    let actual_cols = table.column_names();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a table does NOT contain specific columns
pub fn assert_missing_columns(table: &Table, unexpected_cols: &[&str]) {
    let actual_cols = table.column_names();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
