//! Profiling summary report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

use crate::pipeline::ReductionOutcome;

/// Summary of one load-and-reduce run
#[derive(Debug, Default, Clone, Serialize)]
pub struct ReductionSummary {
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    pub rows_dropped: usize,
    pub promoted_index: Option<String>,
    pub dropped_columns: Vec<String>,
    pub ambiguous_candidates: Vec<String>,
    pub passes: usize,
    #[serde(skip)]
    pub load_time: Duration,
    #[serde(skip)]
    pub reduce_time: Duration,
}

impl ReductionSummary {
    pub fn new(initial_shape: (usize, usize)) -> Self {
        Self {
            initial_rows: initial_shape.0,
            initial_columns: initial_shape.1,
            final_rows: initial_shape.0,
            final_columns: initial_shape.1,
            ..Default::default()
        }
    }

    /// Record what a reduction did and the shape it left behind
    pub fn record_outcome(&mut self, outcome: &ReductionOutcome, final_shape: (usize, usize)) {
        self.final_rows = final_shape.0;
        self.final_columns = final_shape.1;
        self.rows_dropped = outcome.rows_dropped();
        self.promoted_index = outcome.promoted_index().map(str::to_string);
        self.dropped_columns = outcome
            .dropped_columns()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        self.ambiguous_candidates = outcome
            .ambiguous_candidates()
            .map(|c| c.to_vec())
            .unwrap_or_default();
        self.passes = outcome.passes;
    }

    pub fn set_load_time(&mut self, duration: Duration) {
        self.load_time = duration;
    }

    pub fn set_reduce_time(&mut self, duration: Duration) {
        self.reduce_time = duration;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.reduce_time
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("PROFILE SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Initial Shape"),
            Cell::new(format!("({}, {})", self.initial_rows, self.initial_columns)),
        ]);

        table.add_row(vec![
            Cell::new("🗑️  Dropped Rows (all null)"),
            Cell::new(self.rows_dropped).fg(if self.rows_dropped == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        table.add_row(vec![
            Cell::new("🗑️  Dropped Columns (nulls)"),
            Cell::new(self.dropped_columns.len()).fg(if self.dropped_columns.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        table.add_row(vec![
            Cell::new("🔑 Index"),
            match &self.promoted_index {
                Some(name) => Cell::new(name).fg(Color::Cyan),
                None if !self.ambiguous_candidates.is_empty() => {
                    Cell::new(format!("ambiguous ({} candidates)", self.ambiguous_candidates.len()))
                        .fg(Color::Yellow)
                }
                None => Cell::new("default"),
            },
        ]);

        table.add_row(vec![
            Cell::new("✅ Final Shape"),
            Cell::new(format!("({}, {})", self.final_rows, self.final_columns))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("🔁 Passes"),
            Cell::new(self.passes),
        ]);

        table.add_row(vec![
            Cell::new("⏱️  Time"),
            Cell::new(format!(
                "{:.2}s (load {:.2}s, reduce {:.2}s)",
                self.total_time().as_secs_f64(),
                self.load_time.as_secs_f64(),
                self.reduce_time.as_secs_f64()
            )),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.dropped_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Dropped Columns").yellow(),
                style(format!("({})", self.dropped_columns.len())).dim()
            );
            for column in &self.dropped_columns {
                println!("        {} {}", style("•").dim(), column);
            }
        }

        if self.promoted_index.is_none() && !self.ambiguous_candidates.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Index Candidates").yellow(),
                style(format!("({})", self.ambiguous_candidates.len())).dim()
            );
            for column in &self.ambiguous_candidates {
                println!("        {} {}", style("•").dim(), column);
            }
        }
    }
}
