//! Statistical summary: grouped stats to CSV and console, plus the leaderboard.
//!
//! The CSV has one row per algorithm (sorted by name) and four columns per
//! summary metric (`<Metric>_mean`, `_std`, `_min`, `_max`), rounded to 4 decimals.
//! An undefined statistic (single-row std) is written as an empty field.

use std::{
    fmt,
    fs::{self, File},
    io::Write,
    path::Path,
};
use log::info;

use crate::analysis::aggregate::{Direction, GroupStats, StatFn, best_by_metric, group_stats};
use crate::charts::{ReportOutcome, primary_table, reports::statistical_summary_chart};
use crate::data::{
    columns::{ALGORITHM, Metric, SUMMARY_METRICS},
    loader::{ResultTable, TableSet},
};
use crate::utils::error::Result;

pub const SUMMARY_CSV: &str = "statistical_summary.csv";

/// Creates the output directory if absent; a no-op when it already exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Writes the summary CSV and chart, then prints the table and leaderboard.
pub fn statistical_summary(tables: &TableSet, out_dir: &Path) -> Result<ReportOutcome> {
    info!("Creating statistical summary...");
    let mut columns = vec![ALGORITHM];
    columns.extend(SUMMARY_METRICS.iter().map(|m| m.column()));
    let table = match primary_table(tables, &columns) {
        Ok(table) => table,
        Err(skip) => return Ok(skip),
    };

    let metrics: Vec<&str> = SUMMARY_METRICS.iter().map(|m| m.column()).collect();
    let stats = group_stats(table, ALGORITHM, &metrics, &StatFn::ALL)?.sorted();

    let csv_path = out_dir.join(SUMMARY_CSV);
    write_summary_csv(&stats, File::create(&csv_path)?)?;
    let chart_path = statistical_summary_chart(table, out_dir)?;

    println!("\nStatistical Summary:");
    print!("{}", format_summary_table(&stats));

    let leaderboard = Leaderboard::from_table(table)?;
    println!("\nAlgorithm Rankings:");
    print!("{}", leaderboard);

    Ok(ReportOutcome::Written(vec![csv_path, chart_path]))
}

/// Header row followed by one row per group.
pub fn write_summary_csv<W: Write>(stats: &GroupStats, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![stats.group_key().to_string()];
    for metric in stats.metrics() {
        for stat in stats.stats() {
            header.push(format!("{}_{}", metric, stat.label()));
        }
    }
    writer.write_record(&header)?;

    for group in stats.groups() {
        let mut record = vec![group.clone()];
        for metric in stats.metrics() {
            for &stat in stats.stats() {
                record.push(format_value(stats.get(metric, group, stat)));
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Rounded to 4 decimals; undefined values become empty.
fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let rounded = (v * 10_000.0).round() / 10_000.0;
            // avoid "-0"
            format!("{}", if rounded == 0.0 { 0.0 } else { rounded })
        }
        _ => String::new(),
    }
}

/// One block per metric, one aligned line per group.
pub fn format_summary_table(stats: &GroupStats) -> String {
    let width = stats
        .groups()
        .iter()
        .map(|g| g.len())
        .chain(std::iter::once(stats.group_key().len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for metric in stats.metrics() {
        out.push_str(&format!("\n{}\n", metric));
        out.push_str(&format!("{:<width$}", stats.group_key(), width = width));
        for stat in stats.stats() {
            out.push_str(&format!(" {:>12}", stat.label()));
        }
        out.push('\n');

        for group in stats.groups() {
            out.push_str(&format!("{:<width$}", group, width = width));
            for &stat in stats.stats() {
                let cell = match stats.get(metric, group, stat) {
                    Some(v) if v.is_finite() => format!("{:.4}", v),
                    _ => "NaN".to_string(),
                };
                out.push_str(&format!(" {:>12}", cell));
            }
            out.push('\n');
        }
    }
    out
}

/// Best algorithm per headline criterion; `None` when it cannot be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub lowest_cost: Option<String>,
    pub lowest_makespan: Option<String>,
    pub highest_hit_rate: Option<String>,
    pub fastest_execution: Option<String>,
}

impl Leaderboard {
    pub fn from_table(table: &ResultTable) -> Result<Self> {
        let best = |metric: Metric, direction| best_by_metric(table, ALGORITHM, metric.column(), direction);
        Ok(Self {
            lowest_cost: best(Metric::TotalCost, Direction::Min)?,
            lowest_makespan: best(Metric::Makespan, Direction::Min)?,
            highest_hit_rate: best(Metric::DeadlineHitRate, Direction::Max)?,
            fastest_execution: best(Metric::ExecutionTime, Direction::Min)?,
        })
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = [
            ("Lowest Cost", &self.lowest_cost),
            ("Lowest Makespan", &self.lowest_makespan),
            ("Highest Deadline Hit Rate", &self.highest_hit_rate),
            ("Fastest Execution", &self.fastest_execution),
        ];
        for (label, winner) in lines {
            writeln!(f, "{}: {}", label, winner.as_deref().unwrap_or("n/a"))?;
        }
        Ok(())
    }
}
