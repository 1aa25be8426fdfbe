//! Tests for column statistics and feature counts

use exoscope::pipeline::{ColumnStatistics, FeatureCounts};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_column_statistics_basic() {
    let df = df! {
        "pl_name" => ["a", "b", "c", "d"],
        "pl_rade" => [Some(1.0f64), None, Some(2.0), Some(2.0)],
        "disc_year" => [2009i64, 2016, 1995, 2009],
    }
    .unwrap();

    let stats = ColumnStatistics::compute(&df).unwrap();

    assert_eq!(stats.row_count, 4);
    assert_eq!(stats.len(), 3);

    let names: Vec<&str> = stats.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["pl_name", "pl_rade", "disc_year"], "column order is preserved");

    let rade = stats.get("pl_rade").unwrap();
    assert_eq!(rade.null_count, 1);
    assert_eq!(rade.unique_count, 2, "unique count excludes nulls");
    assert_eq!(rade.dtype, DataType::Float64);

    assert_eq!(stats.index_candidates(), vec!["pl_name".to_string()]);
}

#[test]
fn test_all_null_column_is_non_informative() {
    let df = df! {
        "empty" => [None::<i32>, None, None],
    }
    .unwrap();

    let stats = ColumnStatistics::compute(&df).unwrap();
    let empty = stats.get("empty").unwrap();

    assert_eq!(empty.unique_count, 0);
    assert_eq!(empty.null_count, 3);
    assert!(stats.index_candidates().is_empty());
}

#[test]
fn test_feature_counts_per_dtype() {
    let df = df! {
        "id" => [1i64, 2, 3, 4],
        "count" => [1i64, 1, 2, 2],
        "with_nulls" => [Some(1i64), None, Some(2), Some(3)],
        "mass" => [1.0f64, 2.0, 3.0, 4.0],
        "radius" => [Some(1.0f64), None, Some(1.5), Some(1.0)],
    }
    .unwrap();

    let stats = ColumnStatistics::compute(&df).unwrap();
    let counts = FeatureCounts::from_statistics(&stats);

    // i64 has three columns, f64 two
    assert_eq!(counts.rows.len(), 2);
    let ints = &counts.rows[0];
    assert_eq!(ints.dtype, "i64");
    assert_eq!(
        (ints.without_nulls, ints.fully_unique, ints.rest, ints.total),
        (2, 1, 0, 3)
    );

    let floats = &counts.rows[1];
    assert_eq!(floats.dtype, "f64");
    assert_eq!(
        (floats.without_nulls, floats.fully_unique, floats.rest, floats.total),
        (1, 1, 0, 2)
    );

    assert_eq!(counts.total.dtype, "Total");
    assert_eq!(
        (
            counts.total.without_nulls,
            counts.total.fully_unique,
            counts.total.rest,
            counts.total.total
        ),
        (3, 2, 0, 5)
    );
}

#[test]
fn test_without_nulls_includes_fully_unique_columns() {
    let df = df! {
        "id" => [1i64, 2, 3, 4],
        "x" => [1i64, 1, 2, 2],
    }
    .unwrap();

    let stats = ColumnStatistics::compute(&df).unwrap();
    let counts = FeatureCounts::from_statistics(&stats);

    let ints = &counts.rows[0];
    assert_eq!(ints.without_nulls, 2, "the unique id column has no nulls either");
    assert_eq!(ints.fully_unique, 1);
    assert_eq!(ints.total, 2);
    assert_eq!(ints.rest, -1, "rest is total minus both counts");
}

#[test]
fn test_grand_total_equals_sum_of_rows() {
    let df = common::create_random_dataframe(25, 10, 0.2, 42);
    let stats = ColumnStatistics::compute(&df).unwrap();
    let counts = FeatureCounts::from_statistics(&stats);

    let rows = &counts.rows;
    assert_eq!(counts.total.without_nulls, rows.iter().map(|r| r.without_nulls).sum::<usize>());
    assert_eq!(counts.total.fully_unique, rows.iter().map(|r| r.fully_unique).sum::<usize>());
    assert_eq!(counts.total.rest, rows.iter().map(|r| r.rest).sum::<i64>());
    assert_eq!(counts.total.total, rows.iter().map(|r| r.total).sum::<usize>());
    assert_eq!(counts.total.total, df.width());
}

#[test]
fn test_null_fractions_sorted_descending() {
    let df = df! {
        "a" => [Some(1i32), None, None, Some(4)],
        "b" => [Some(1i32), Some(2), Some(3), None],
        "c" => [1i32, 2, 3, 4],
    }
    .unwrap();

    let fractions = ColumnStatistics::compute(&df).unwrap().null_fractions();

    assert_eq!(fractions[0], ("a".to_string(), 0.5));
    assert_eq!(fractions[1], ("b".to_string(), 0.25));
    assert_eq!(fractions[2], ("c".to_string(), 0.0));
}
