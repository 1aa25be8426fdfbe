//! Titled table display for statistics, in rich or plain form

use anyhow::Result;
use clap::ValueEnum;
use comfy_table::{presets, Attribute, Cell, Color, Table};
use console::style;
use polars::prelude::AnyValue;

use crate::pipeline::{ColumnStatistics, FeatureCountRow, FeatureCounts, ReduceOptions, ReductionOutcome};
use crate::report::plots::render_diagnostic_charts;
use crate::utils::{print_success, print_warning};

/// How tables are rendered. Chosen once at startup by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Styled headings and UTF-8 tables with colors
    Rich,
    /// Dash-underlined titles and ASCII tables
    #[default]
    Plain,
}

fn new_table(mode: OutputMode) -> Table {
    let mut table = Table::new();
    match mode {
        OutputMode::Rich => {
            table.load_preset(presets::UTF8_FULL_CONDENSED);
        }
        OutputMode::Plain => {
            table.load_preset(presets::ASCII_FULL_CONDENSED);
            table.force_no_tty();
        }
    }
    table
}

fn header_cell(text: &str, mode: OutputMode) -> Cell {
    match mode {
        OutputMode::Rich => Cell::new(text).add_attribute(Attribute::Bold),
        OutputMode::Plain => Cell::new(text),
    }
}

fn colored_cell<T: ToString>(value: T, color: Option<Color>, mode: OutputMode) -> Cell {
    match (mode, color) {
        (OutputMode::Rich, Some(color)) => Cell::new(value).fg(color),
        _ => Cell::new(value),
    }
}

/// Render a title line followed by a table
pub fn format_with_title(title: &str, table: &Table, mode: OutputMode) -> String {
    let mut out = String::new();
    match mode {
        OutputMode::Rich => {
            out.push_str(&format!("    {}\n", style(format!("### {}", title)).white().bold()));
        }
        OutputMode::Plain => {
            out.push_str(&format!("{}\n{}\n", title, "-".repeat(title.chars().count())));
        }
    }
    for line in table.to_string().lines() {
        match mode {
            OutputMode::Rich => out.push_str(&format!("    {}\n", line)),
            OutputMode::Plain => out.push_str(&format!("{}\n", line)),
        }
    }
    out
}

/// Print a blank line, the title, then the table
pub fn display_with_title(title: &str, table: &Table, mode: OutputMode) {
    println!();
    print!("{}", format_with_title(title, table, mode));
}

/// Table of per-column statistics
pub fn column_statistics_table(stats: &ColumnStatistics, mode: OutputMode) -> Table {
    let mut table = new_table(mode);
    table.set_header(vec![
        header_cell("Column Name", mode),
        header_cell("Data Type", mode),
        header_cell("Null Count", mode),
        header_cell("Unique Count", mode),
    ]);

    for stat in &stats.columns {
        let null_color = (stat.null_count > 0).then_some(Color::Red);
        let unique_color = stats.is_fully_unique(stat).then_some(Color::Green);
        table.add_row(vec![
            Cell::new(&stat.name),
            colored_cell(&stat.dtype, Some(Color::Cyan), mode),
            colored_cell(stat.null_count, null_color, mode),
            colored_cell(stat.unique_count, unique_color, mode),
        ]);
    }
    table
}

fn feature_count_cells(row: &FeatureCountRow, mode: OutputMode, total: bool) -> Vec<Cell> {
    let cells = vec![
        Cell::new(&row.dtype),
        Cell::new(row.without_nulls),
        Cell::new(row.fully_unique),
        Cell::new(row.rest),
        Cell::new(row.total),
    ];
    if total && mode == OutputMode::Rich {
        cells
            .into_iter()
            .map(|c| c.add_attribute(Attribute::Bold))
            .collect()
    } else {
        cells
    }
}

/// Table of per-dtype feature counts with the grand total as last row
pub fn feature_counts_table(counts: &FeatureCounts, mode: OutputMode) -> Table {
    let mut table = new_table(mode);
    table.set_header(vec![
        header_cell("Data Type", mode),
        header_cell("Features Without Nulls", mode),
        header_cell("Features Fully Unique", mode),
        header_cell("Rest", mode),
        header_cell("Total per dtype", mode),
    ]);

    for row in &counts.rows {
        table.add_row(feature_count_cells(row, mode, false));
    }
    table.add_row(feature_count_cells(&counts.total, mode, true));
    table
}

/// Format a cell value for display; nulls render empty
pub fn format_value(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Table of the first rows of a dataset, index first when one was promoted
pub fn sample_rows_table(table: &crate::pipeline::Table, mode: OutputMode) -> Result<Table> {
    let frame = table.frame();
    let mut out = new_table(mode);

    let mut header = Vec::with_capacity(frame.width() + 1);
    header.push(header_cell(table.index_name().unwrap_or(""), mode));
    for name in frame.get_column_names() {
        header.push(header_cell(name.as_str(), mode));
    }
    out.set_header(header);

    for row in 0..table.height() {
        let mut cells = Vec::with_capacity(frame.width() + 1);
        let label = match table.index() {
            Some(index) => format_value(&index.get(row)?),
            None => row.to_string(),
        };
        cells.push(colored_cell(label, Some(Color::DarkGrey), mode));
        for column in frame.get_columns() {
            cells.push(Cell::new(format_value(&column.get(row)?)));
        }
        out.add_row(cells);
    }
    Ok(out)
}

/// Show statistics, charts and final shape after a reduction
pub fn display_reduction(
    table: &crate::pipeline::Table,
    outcome: &ReductionOutcome,
    options: &ReduceOptions,
) -> Result<()> {
    let mode = options.output_mode;
    display_with_title(
        "Columns Statistics Summary",
        &column_statistics_table(&outcome.statistics, mode),
        mode,
    );
    display_with_title(
        "Feature Counts Summary",
        &feature_counts_table(&outcome.feature_counts, mode),
        mode,
    );

    println!();
    match &options.plots {
        Some(config) => {
            let written = render_diagnostic_charts(table.frame(), &outcome.statistics, config)?;
            print_success(&format!(
                "Wrote {} diagnostic chart(s) to {}",
                written.len(),
                config.dir.display()
            ));
        }
        None => print_warning("No chart directory configured, diagnostic charts are skipped"),
    }

    let (rows, cols) = table.shape();
    println!("    Final dataset shape: ({}, {})", rows, cols);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_plain_title_is_dash_underlined() {
        let table = new_table(OutputMode::Plain);
        let out = format_with_title("Feature Counts Summary", &table, OutputMode::Plain);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Feature Counts Summary"));
        assert_eq!(lines.next(), Some("-".repeat(22).as_str()));
    }

    #[test]
    fn test_feature_counts_table_ends_with_total() {
        let df = df! {
            "id" => [1i64, 2, 3],
            "x" => [Some(1.0f64), None, Some(2.0)],
        }
        .unwrap();
        let stats = ColumnStatistics::compute(&df).unwrap();
        let counts = FeatureCounts::from_statistics(&stats);

        let rendered = feature_counts_table(&counts, OutputMode::Plain).to_string();
        let last_data_line = rendered
            .lines()
            .filter(|l| l.starts_with('|'))
            .last()
            .unwrap();
        assert!(last_data_line.contains("Total"));
    }

    #[test]
    fn test_format_value_null_is_empty() {
        assert_eq!(format_value(&AnyValue::Null), "");
        assert_eq!(format_value(&AnyValue::String("Kepler-22 b")), "Kepler-22 b");
        assert_eq!(format_value(&AnyValue::Int64(42)), "42");
    }
}
