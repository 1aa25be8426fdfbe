//! Iterative table reduction: drop fully-null rows, promote a unique column to the
//! index, prune mostly-null columns, repeat until nothing changes.

use std::collections::BTreeMap;

use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::pipeline::stats::{ColumnStatistics, FeatureCounts};
use crate::pipeline::table::Table;
use crate::report::{display_reduction, OutputMode, PlotConfig};
use crate::utils::{print_info, print_step_detail};

/// Options controlling what the reducer reports while it runs
#[derive(Debug, Clone, Default)]
pub struct ReduceOptions {
    /// Print progress messages and the final summaries
    pub verbose: bool,
    pub output_mode: OutputMode,
    /// Where to render the diagnostic charts. Only used when verbose.
    pub plots: Option<PlotConfig>,
}

impl ReduceOptions {
    pub fn quiet() -> Self {
        Self::default()
    }
}

/// A column removed by null pruning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedColumn {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
}

/// One change (or non-change worth reporting) made during reduction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReductionStep {
    RowsDropped { count: usize },
    IndexPromoted { column: String },
    /// Several columns qualified as index; none was promoted
    AmbiguousIndex { candidates: Vec<String> },
    ColumnsDropped { columns: Vec<DroppedColumn> },
}

/// Statistics for the reduced table plus a log of what the reduction did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReductionOutcome {
    pub statistics: ColumnStatistics,
    pub feature_counts: FeatureCounts,
    pub steps: Vec<ReductionStep>,
    pub passes: usize,
}

impl ReductionOutcome {
    pub fn rows_dropped(&self) -> usize {
        self.steps
            .iter()
            .map(|s| match s {
                ReductionStep::RowsDropped { count } => *count,
                _ => 0,
            })
            .sum()
    }

    pub fn promoted_index(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| match s {
            ReductionStep::IndexPromoted { column } => Some(column.as_str()),
            _ => None,
        })
    }

    pub fn dropped_columns(&self) -> Vec<&DroppedColumn> {
        self.steps
            .iter()
            .flat_map(|s| match s {
                ReductionStep::ColumnsDropped { columns } => columns.iter().collect(),
                _ => Vec::new(),
            })
            .collect()
    }

    /// Candidates from the most recent ambiguous promotion attempt
    pub fn ambiguous_candidates(&self) -> Option<&[String]> {
        self.steps.iter().rev().find_map(|s| match s {
            ReductionStep::AmbiguousIndex { candidates } => Some(candidates.as_slice()),
            _ => None,
        })
    }
}

/// Reduce the table in place until it reaches a fixed point.
///
/// Each pass drops fully-null rows, recomputes column statistics, then tries index
/// promotion (only while the default index is in use) and null-column pruning. A
/// promotion or a drop restarts the pass; every restart removes at least one column,
/// so the loop ends after at most `width + 1` passes.
pub fn reduce(table: &mut Table, options: &ReduceOptions) -> Result<ReductionOutcome> {
    let verbose = options.verbose;
    let mut steps: Vec<ReductionStep> = Vec::new();
    let mut passes = 0;

    let statistics = loop {
        passes += 1;

        let rows_dropped = table.drop_null_rows()?;
        if rows_dropped > 0 {
            if verbose {
                print_info(&format!("Dropped {} fully-null row(s)", rows_dropped));
            }
            steps.push(ReductionStep::RowsDropped {
                count: rows_dropped,
            });
        }

        let stats = ColumnStatistics::for_table(table)?;

        if table.uses_default_index() {
            let candidates = stats.index_candidates();
            match candidates.as_slice() {
                [] => {
                    if verbose {
                        print_info("No single column that can be used as index");
                    }
                }
                [column] => {
                    if verbose {
                        print_info(&format!("Setting {} as index", style(column).cyan()));
                    }
                    table.promote_index(column)?;
                    steps.push(ReductionStep::IndexPromoted {
                        column: column.clone(),
                    });
                    continue;
                }
                _ => {
                    if verbose {
                        print_info(&format!(
                            "Multiple columns that can be used as index: {:?}",
                            candidates
                        ));
                    }
                    let repeated = matches!(
                        steps.last(),
                        Some(ReductionStep::AmbiguousIndex { candidates: previous }) if *previous == candidates
                    );
                    if !repeated {
                        steps.push(ReductionStep::AmbiguousIndex {
                            candidates: candidates.clone(),
                        });
                    }
                }
            }
        }

        let high_null = stats.high_null_columns();
        if !high_null.is_empty() {
            let dropped: Vec<DroppedColumn> = high_null
                .iter()
                .map(|c| DroppedColumn {
                    name: c.name.clone(),
                    dtype: c.dtype.to_string(),
                    null_count: c.null_count,
                })
                .collect();

            if verbose {
                report_dropped_columns(&dropped);
            }

            let names: Vec<String> = dropped.iter().map(|c| c.name.clone()).collect();
            table.drop_columns(&names);
            steps.push(ReductionStep::ColumnsDropped { columns: dropped });
            continue;
        }

        break stats;
    };

    let feature_counts = FeatureCounts::from_statistics(&statistics);
    let outcome = ReductionOutcome {
        statistics,
        feature_counts,
        steps,
        passes,
    };

    if verbose {
        display_reduction(table, &outcome, options)?;
    }

    Ok(outcome)
}

/// Print dropped columns grouped by data type
fn report_dropped_columns(dropped: &[DroppedColumn]) {
    let mut by_dtype: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for column in dropped {
        by_dtype
            .entry(column.dtype.as_str())
            .or_default()
            .push(column.name.as_str());
    }

    println!();
    println!(
        "    {}",
        style("Dropping columns with only null values or high ratio of nulls:").yellow()
    );
    println!("    {}", style("-".repeat(60)).dim());
    for (dtype, names) in by_dtype {
        print_step_detail(&format!(
            "There are {} columns of type {} with only null values:",
            style(names.len()).yellow().bold(),
            style(dtype).cyan()
        ));
        print_step_detail(&format!("{:?}", names));
        println!("    {}", style("-".repeat(60)).dim());
    }
}
