//! JSON export of a profiling run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{ColumnStatistics, FeatureCounts, ReductionOutcome, ReductionStep};
use crate::report::ReductionSummary;

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub exoscope_version: String,
    pub dataset: String,
    pub cache_file: String,
}

/// Timing information in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingInfo {
    pub load_ms: u64,
    pub reduce_ms: u64,
    pub total_ms: u64,
}

/// Complete profile report
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub metadata: ReportMetadata,
    pub summary: ReductionSummary,
    pub timing: TimingInfo,
    pub steps: Vec<ReductionStep>,
    pub column_statistics: ColumnStatistics,
    pub feature_counts: FeatureCounts,
}

impl ProfileReport {
    pub fn new(
        dataset: &str,
        cache_file: &Path,
        summary: &ReductionSummary,
        outcome: &ReductionOutcome,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                exoscope_version: env!("CARGO_PKG_VERSION").to_string(),
                dataset: dataset.to_string(),
                cache_file: cache_file.display().to_string(),
            },
            summary: summary.clone(),
            timing: TimingInfo {
                load_ms: summary.load_time.as_millis() as u64,
                reduce_ms: summary.reduce_time.as_millis() as u64,
                total_ms: summary.total_time().as_millis() as u64,
            },
            steps: outcome.steps.clone(),
            column_statistics: outcome.statistics.clone(),
            feature_counts: outcome.feature_counts.clone(),
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize profile report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write profile report: {}", path.display()))?;
        Ok(())
    }
}
