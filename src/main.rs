//! # Results Analysis Entry Point
//!
//! Loads every CSV in the results directory, renders the chart reports, writes the
//! statistical summary and prints the leaderboard.
//!
//! ## Outputs (`--output-dir`, default `analysis_plots/`)
//! - `algorithm_comparison.svg`, `average_performance.svg`, `scenario_analysis.svg`,
//!   `scalability_analysis.svg`, `correlation_matrix.svg`, `scatter_matrix.svg`,
//!   `performance_heatmaps.svg`, `statistical_summary.svg`
//! - `statistical_summary.csv`, `significance_tests.csv`
//!
//! Missing tables, columns or scenario rows skip the affected report; the run still
//! completes and exits 0.

use anyhow::Context;
use clap::Parser;
use log::info;

use iiot_analysis::{report::pipeline, utils::config::AnalyzeArgs};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = AnalyzeArgs::parse();

    info!("=== IIoT SCHEDULER RESULTS ANALYSIS START ===");
    println!("Results: {}", args.results_dir.display());
    println!("Output:  {}", args.output_dir.display());

    let summary = pipeline::run(&args)
        .with_context(|| format!("cannot write to {}", args.output_dir.display()))?;

    println!("\nAnalysis completed: {}", summary);
    println!("Plots saved to {}", args.output_dir.display());
    info!("=== IIoT SCHEDULER RESULTS ANALYSIS FINISHED ===");
    Ok(())
}
