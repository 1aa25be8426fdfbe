//! Diagnostic charts rendered to SVG with plotters
//!
//! Three charts describe the reduced table:
//! - null percentage per column (bar chart, descending)
//! - null count per row (histogram)
//! - unique values per column (bar chart, descending)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;
use polars::prelude::DataFrame;

use crate::pipeline::{row_null_counts, ColumnStatistics};

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const SALMON: RGBColor = RGBColor(250, 128, 114);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);

/// Number of bins for the per-row null histogram
pub const ROW_HISTOGRAM_BINS: usize = 30;

/// Where and how large to render charts
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl PlotConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            width: 1000,
            height: 600,
        }
    }

    fn path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.svg", stem))
    }
}

fn chart_error<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow!("Failed to draw chart: {}", err)
}

/// Render all three charts into `config.dir`, returning the written paths
pub fn render_diagnostic_charts(
    frame: &DataFrame,
    stats: &ColumnStatistics,
    config: &PlotConfig,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&config.dir)
        .with_context(|| format!("Failed to create chart directory: {}", config.dir.display()))?;

    let mut written = Vec::with_capacity(3);

    let null_path = config.path("null_percentage_per_column");
    draw_bar_chart(
        &null_path,
        config,
        "Histogram of nulls per column (Percentage)",
        "Column Name",
        "Percentage of Nulls per Column",
        &stats.null_fractions(),
        SKY_BLUE,
        &|y| format!("{:.2}%", y * 100.0),
    )?;
    written.push(null_path);

    let row_path = config.path("nulls_per_row");
    let per_row: Vec<f64> = row_null_counts(frame).into_iter().map(|c| c as f64).collect();
    draw_histogram(
        &row_path,
        config,
        &format!("Histogram of Null Values per Row (row length = {})", frame.width()),
        "Number of Nulls per Row",
        "Number of Rows",
        &per_row,
        ROW_HISTOGRAM_BINS,
        SALMON,
    )?;
    written.push(row_path);

    let unique_path = config.path("unique_values_per_column");
    let unique: Vec<(String, f64)> = stats
        .unique_counts_sorted()
        .into_iter()
        .map(|(name, count)| (name, count as f64))
        .collect();
    draw_bar_chart(
        &unique_path,
        config,
        &format!(
            "Histogram of Unique Features per Column (total rows: {})",
            stats.row_count
        ),
        "Column Name",
        "Number of Unique Features per Column",
        &unique,
        LIGHT_GREEN,
        &|y| format!("{:.0}", y),
    )?;
    written.push(unique_path);

    Ok(written)
}

#[allow(clippy::too_many_arguments)]
fn draw_bar_chart(
    path: &Path,
    config: &PlotConfig,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    color: RGBColor,
    y_formatter: &dyn Fn(&f64) -> String,
) -> Result<()> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let slots = bars.len().max(1);
    let y_max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(140)
        .y_label_area_size(80)
        .build_cartesian_2d((0..slots).into_segmented(), 0.0..y_max)
        .map_err(chart_error)?;

    let label_for = |segment: &SegmentValue<usize>| match segment {
        SegmentValue::CenterOf(i) => bars.get(*i).map(|(name, _)| name.clone()).unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(slots)
        .x_label_formatter(&label_for)
        .x_label_style(("sans-serif", 10).into_font().transform(FontTransform::Rotate90))
        .y_label_formatter(y_formatter)
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(2)
                .data(bars.iter().enumerate().map(|(i, (_, v))| (i, *v))),
        )
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

/// Equal-width bins over `values`: (lower edge, bin width, counts)
pub fn histogram_bins(values: &[f64], bins: usize) -> (f64, f64, Vec<usize>) {
    let bins = bins.max(1);
    let mut counts = vec![0usize; bins];
    if values.is_empty() {
        return (0.0, 1.0, counts);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min {
        (max - min) / bins as f64
    } else {
        1.0 / bins as f64
    };

    for &value in values {
        let bin = ((value - min) / width).floor() as usize;
        counts[bin.min(bins - 1)] += 1;
    }
    (min, width, counts)
}

#[allow(clippy::too_many_arguments)]
fn draw_histogram(
    path: &Path,
    config: &PlotConfig,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    values: &[f64],
    bins: usize,
    color: RGBColor,
) -> Result<()> {
    let (min, width, counts) = histogram_bins(values, bins);
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let x_end = min + width * counts.len() as f64;

    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min..x_end, 0.0..max_count * 1.1)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = min + i as f64 * width;
            let x1 = x0 + width * 0.9;
            Rectangle::new([(x0, 0.0), (x1, count as f64)], color.filled())
        }))
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}
