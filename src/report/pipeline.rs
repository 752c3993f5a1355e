//! Loader → aggregator/renderer → writer, one report at a time.
//!
//! A report that is skipped or fails is logged and the run moves on to the next one;
//! only an unusable output directory stops the run.

use std::{
    fmt,
    path::{Path, PathBuf},
};
use log::{error, info, warn};

use crate::charts::{ReportOutcome, reports};
use crate::data::loader::{TableSet, load_tables};
use crate::report::{significance, writer};
use crate::utils::{config::AnalyzeArgs, error::Result};

/// Signature shared by every report step.
pub type ReportFn = fn(&TableSet, &Path) -> Result<ReportOutcome>;

/// Reports in run order.
pub const REPORTS: [(&str, ReportFn); 7] = [
    ("algorithm comparison", reports::algorithm_comparison),
    ("scenario analysis", reports::scenario_analysis),
    ("scalability analysis", reports::scalability_analysis),
    ("correlation analysis", reports::correlation_analysis),
    ("performance heatmaps", reports::performance_heatmaps),
    ("statistical summary", writer::statistical_summary),
    ("significance tests", significance::significance_tests),
];

/// What one run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tables_loaded: usize,
    pub load_failures: usize,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<(String, String)>,
    pub failed: Vec<(String, String)>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tables loaded, {} artifacts written, {} reports skipped, {} failed",
            self.tables_loaded,
            self.written.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

pub fn run(args: &AnalyzeArgs) -> Result<RunSummary> {
    writer::ensure_output_dir(&args.output_dir)?;

    let load = load_tables(&args.results_dir);
    let mut summary = RunSummary {
        tables_loaded: load.tables.len(),
        load_failures: load.failures.len(),
        ..Default::default()
    };

    for (name, report) in REPORTS {
        match report(&load.tables, &args.output_dir) {
            Ok(ReportOutcome::Written(paths)) => {
                for path in &paths {
                    info!("Saved {}", path.display());
                }
                summary.written.extend(paths);
            }
            Ok(ReportOutcome::Skipped(reason)) => {
                warn!("Skipping {}: {}", name, reason);
                summary.skipped.push((name.to_string(), reason));
            }
            Err(e) => {
                error!("{} failed: {}", name, e);
                summary.failed.push((name.to_string(), e.to_string()));
            }
        }
    }

    Ok(summary)
}
