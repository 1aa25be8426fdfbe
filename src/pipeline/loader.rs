//! Dataset loader: keeps a CSV cache of remote datasets under `<project>/datasets/`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::archive::{strip_dex_units, DatasetSource};
use crate::pipeline::table::Table;
use crate::utils::{create_spinner, finish_with_success, print_info};

/// Dataset loaded when none is named
pub const DEFAULT_DATASET: &str = "pscomppars";

/// Options for loading a dataset
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Number of rows to use for CSV schema inference (0 = full scan)
    pub infer_schema_length: usize,
    /// Fetch again even when a cache file exists
    pub refresh: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10_000,
            refresh: false,
        }
    }
}

/// Cache file for a dataset: `<project_path>/datasets/<name>.csv`.
/// A name already ending in `.csv` is used as the file name unchanged.
pub fn cache_path(project_path: &Path, name: &str) -> PathBuf {
    let filename = if name.ends_with(".csv") {
        name.to_string()
    } else {
        format!("{}.csv", name)
    };
    project_path.join("datasets").join(filename)
}

/// Remote table name for a dataset name
pub fn table_name(name: &str) -> &str {
    name.strip_suffix(".csv").unwrap_or(name)
}

/// Make sure the cache file for `name` exists, fetching it from `source` when it does
/// not (or when `refresh` is set). Returns the cache path.
///
/// The download is written to a `.part` sibling and renamed into place, so an
/// interrupted attempt never leaves a truncated cache behind.
pub fn ensure_cached(
    source: &dyn DatasetSource,
    project_path: &Path,
    name: &str,
    refresh: bool,
) -> Result<PathBuf> {
    let path = cache_path(project_path, name);
    if path.exists() && !refresh {
        return Ok(path);
    }

    let table = table_name(name);
    let spinner = create_spinner(&format!("Downloading {} ... This may take a while...", table));
    let mut df = source
        .fetch(table)
        .with_context(|| format!("Failed to fetch dataset '{}'", table))?;
    finish_with_success(&spinner, &format!("Downloaded {} ({} rows)", table, df.height()));

    strip_dex_units(&mut df).context("Failed to strip units from dex columns")?;

    let dir = path
        .parent()
        .context("Cache path has no parent directory")?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;

    let partial = path.with_extension("csv.part");
    let mut file = fs::File::create(&partial)
        .with_context(|| format!("Failed to create cache file: {}", partial.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("Failed to write cache file: {}", partial.display()))?;
    drop(file);

    fs::rename(&partial, &path)
        .with_context(|| format!("Failed to move cache file into place: {}", path.display()))?;
    print_info(&format!("Cached {} to {}", table, path.display()));

    Ok(path)
}

/// Load a cached CSV into a DataFrame, returning it with its shape
pub fn load_cached_dataset(path: &Path, infer_schema_length: usize) -> Result<(DataFrame, usize, usize)> {
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let spinner = create_spinner("Loading cached dataset...");
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .finish()
        .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        .collect()
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    let (rows, cols) = df.shape();
    finish_with_success(&spinner, "Dataset loaded");

    Ok((df, rows, cols))
}

/// Load a named exoplanet dataset, downloading and caching it on first use.
pub fn load_exoplanet_data(
    source: &dyn DatasetSource,
    project_path: &Path,
    name: &str,
    options: &LoadOptions,
) -> Result<Table> {
    let path = ensure_cached(source, project_path, name, options.refresh)?;
    let (df, rows, cols) = load_cached_dataset(&path, options.infer_schema_length)?;

    println!(
        "    Dataset {} loaded with shape: ({}, {})",
        table_name(name),
        rows,
        cols
    );

    Ok(Table::new(df))
}
