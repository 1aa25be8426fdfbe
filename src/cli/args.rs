//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::{cache_path, ArchiveConfig, LoadOptions, ReduceOptions, DEFAULT_ARCHIVE_URL, DEFAULT_DATASET};
use crate::report::{OutputMode, PlotConfig};

/// exoscope - Download, cache and profile an exoplanet dataset
#[derive(Parser, Debug)]
#[command(name = "exoscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory; the cache lives in its 'datasets/' subdirectory
    #[arg(short, long, default_value = ".")]
    pub project_path: PathBuf,

    /// Dataset (archive table) name. A trailing '.csv' is accepted.
    #[arg(short, long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// Number of sample rows to display after loading (0 disables)
    #[arg(long, default_value = "5")]
    pub head: usize,

    /// How statistics tables are rendered
    #[arg(long, value_enum, default_value_t = OutputMode::Plain)]
    pub output_mode: OutputMode,

    /// Directory for the diagnostic charts (SVG). Charts are skipped when not set.
    #[arg(long)]
    pub plots_dir: Option<PathBuf>,

    /// Write a JSON profile report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Download the dataset again even if a cached copy exists
    #[arg(long, default_value = "false")]
    pub refresh: bool,

    /// Only print the final summary, not the per-step statistics
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Base URL of the exoplanet archive
    #[arg(long, env = "EXOPLANET_ARCHIVE_URL", default_value = DEFAULT_ARCHIVE_URL)]
    pub archive_url: String,

    /// HTTP timeout in seconds for the dataset download
    #[arg(long, default_value = "300", value_parser = validate_timeout)]
    pub timeout: u64,

    /// Number of rows to use for schema inference.
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Path of the cache file for the selected dataset
    pub fn cache_file(&self) -> PathBuf {
        cache_path(&self.project_path, &self.dataset)
    }

    pub fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig {
            base_url: self.archive_url.clone(),
            timeout: Duration::from_secs(self.timeout),
            infer_schema_length: if self.infer_schema_length == 0 {
                None
            } else {
                Some(self.infer_schema_length)
            },
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            infer_schema_length: self.infer_schema_length,
            refresh: self.refresh,
        }
    }

    pub fn reduce_options(&self) -> ReduceOptions {
        ReduceOptions {
            verbose: !self.quiet,
            output_mode: self.output_mode,
            plots: self.plots_dir.as_ref().map(PlotConfig::new),
        }
    }
}

/// Validator for the timeout parameter
fn validate_timeout(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of seconds", s))?;

    if value == 0 {
        Err("timeout must be greater than 0".to_string())
    } else {
        Ok(value)
    }
}
