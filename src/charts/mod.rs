//! Chart rendering for the six report types.
//!
//! Every artifact is an SVG with a fixed file name inside the output directory, so a
//! re-run overwrites the previous one. A report whose inputs are absent returns
//! [`ReportOutcome::Skipped`] instead of failing the run.

pub mod palette;
pub mod panels;
pub mod reports;

use std::path::{Path, PathBuf};

use crate::data::{columns::PRIMARY_TABLE, loader::{ResultTable, TableSet}};

pub const ALGORITHM_COMPARISON: &str = "algorithm_comparison";
pub const AVERAGE_PERFORMANCE: &str = "average_performance";
pub const SCENARIO_ANALYSIS: &str = "scenario_analysis";
pub const SCALABILITY_ANALYSIS: &str = "scalability_analysis";
pub const CORRELATION_MATRIX: &str = "correlation_matrix";
pub const SCATTER_MATRIX: &str = "scatter_matrix";
pub const PERFORMANCE_HEATMAPS: &str = "performance_heatmaps";
pub const STATISTICAL_SUMMARY: &str = "statistical_summary";

pub const TITLE_FONT: (&str, u32) = ("sans-serif", 28);

/// `<dir>/<name>.svg`
pub fn artifact_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.svg", name))
}

/// What a report did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Files written, in order.
    Written(Vec<PathBuf>),
    /// Inputs absent; nothing written.
    Skipped(String),
}

/// Primary results table, provided it carries every column in `columns`.
pub(crate) fn primary_table<'t>(
    tables: &'t TableSet,
    columns: &[&str],
) -> Result<&'t ResultTable, ReportOutcome> {
    let Some(table) = tables.primary() else {
        return Err(ReportOutcome::Skipped(format!("table '{}' not loaded", PRIMARY_TABLE)));
    };
    if let Some(missing) = columns.iter().find(|c| !table.has_column(c)) {
        return Err(ReportOutcome::Skipped(format!(
            "column '{}' missing from '{}'",
            missing, PRIMARY_TABLE
        )));
    }
    Ok(table)
}
