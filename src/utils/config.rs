//! Command-line configuration for both binaries.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_RESULTS_DIR: &str = "quick_results";
pub const DEFAULT_OUTPUT_DIR: &str = "analysis_plots";
pub const DEFAULT_BATCH_INPUT: &str = "batch_task.csv";
pub const DEFAULT_WORKFLOW_OUTPUT: &str = "workflow.txt";

/// Renders charts and summary statistics from scheduler experiment results.
#[derive(Debug, Clone, Parser)]
#[command(name = "iiot-analyze", version)]
pub struct AnalyzeArgs {
    /// Directory containing the result CSV files.
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// Directory receiving charts and summary tables.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Converts a headerless batch-task CSV into a simulator workflow file.
#[derive(Debug, Clone, Parser)]
#[command(name = "workflow-convert", version)]
pub struct ConvertArgs {
    /// Batch-task CSV (no header row).
    #[arg(long, default_value = DEFAULT_BATCH_INPUT)]
    pub input: PathBuf,

    /// Workflow text file to write.
    #[arg(long, default_value = DEFAULT_WORKFLOW_OUTPUT)]
    pub output: PathBuf,
}
