//! exoscope: Exoplanet Dataset Profiling CLI
//!
//! Loads the default dataset (downloading it on first use), prints a few sample
//! rows, then reduces the table and reports column statistics.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use exoscope::cli::Cli;
use exoscope::pipeline::{load_exoplanet_data, reduce, NasaExoplanetArchive};
use exoscope::report::{display_with_title, sample_rows_table, ProfileReport, ReductionSummary};
use exoscope::utils::{print_banner, print_completion, print_config, print_step_header, print_success};

fn main() -> Result<()> {
    let cli = Cli::parse();

    print_banner(env!("CARGO_PKG_VERSION"));

    let cache_file = cli.cache_file();
    print_config(
        &cli.project_path,
        &cli.dataset,
        &cache_file,
        cli.plots_dir.as_deref(),
    );

    // Step 1: Load dataset (download and cache on first use)
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let archive = NasaExoplanetArchive::with_config(cli.archive_config())?;
    let mut table = load_exoplanet_data(&archive, &cli.project_path, &cli.dataset, &cli.load_options())?;
    let load_elapsed = step_start.elapsed();

    let mut summary = ReductionSummary::new(table.shape());
    summary.set_load_time(load_elapsed);

    if cli.head > 0 {
        let sample = sample_rows_table(&table.head(cli.head), cli.output_mode)?;
        display_with_title(
            &format!("First {} rows of the {} dataset", cli.head, cli.dataset),
            &sample,
            cli.output_mode,
        );
    }

    // Step 2: Reduce to informative columns
    print_step_header(2, "Reduce Columns");
    let step_start = Instant::now();
    let outcome = reduce(&mut table, &cli.reduce_options())?;
    summary.set_reduce_time(step_start.elapsed());
    summary.record_outcome(&outcome, table.shape());

    summary.display();

    if let Some(path) = &cli.report {
        ProfileReport::new(&cli.dataset, &cache_file, &summary, &outcome).write(path)?;
        print_success(&format!("Report written to {}", path.display()));
    }

    print_completion();

    Ok(())
}
