//! The six chart reports. Each one re-derives the subset it needs from the immutable
//! primary table, opens its own SVG surface, presents it and drops it before returning.

use plotters::prelude::*;
use std::path::{Path, PathBuf};
use log::{info, warn};

use crate::analysis::{
    aggregate::{AggFn, PivotTable, StatFn, group_stats, grouped_values, pivot},
    correlation::correlation_matrix,
};
use crate::charts::{
    ALGORITHM_COMPARISON, AVERAGE_PERFORMANCE, CORRELATION_MATRIX, PERFORMANCE_HEATMAPS,
    ReportOutcome, SCALABILITY_ANALYSIS, SCATTER_MATRIX, SCENARIO_ANALYSIS, STATISTICAL_SUMMARY,
    TITLE_FONT, artifact_path,
    palette::ColorScale,
    panels::{
        Area, Marker, box_panel, grouped_bar_panel, heatmap_panel, kde_panel, line_panel,
        scatter3d_panel, scatter_panel,
    },
    primary_table,
};
use crate::data::{
    columns::{
        ALGORITHM, COMPARISON_METRICS, CORRELATION_COLUMNS, HEADLINE_METRICS, Metric,
        NODE_COUNT, SCALABILITY_SCENARIO, SCENARIO, SUMMARY_METRICS, TASK_COUNT,
    },
    loader::{ResultTable, TableSet},
};
use crate::utils::error::Result;

macro_rules! require_primary {
    ($tables:expr, $columns:expr) => {
        match primary_table($tables, $columns) {
            Ok(table) => table,
            Err(skip) => return Ok(skip),
        }
    };
}

/// Box plots of six metrics by algorithm, plus normalized average bars.
///
/// The bars only need the headline metrics, so a table lacking one of the other box-plot
/// metrics still gets them.
pub fn algorithm_comparison(tables: &TableSet, out_dir: &Path) -> Result<ReportOutcome> {
    info!("Creating algorithm comparison plots...");
    let mut columns = vec![ALGORITHM];
    columns.extend(HEADLINE_METRICS.iter().map(|m| m.column()));
    let table = require_primary!(tables, &columns);
    let mut written = Vec::with_capacity(2);

    match COMPARISON_METRICS.iter().find(|m| !table.has_column(m.column())) {
        Some(missing) => warn!(
            "Skipping {}: column '{}' missing",
            ALGORITHM_COMPARISON,
            missing.column()
        ),
        None => {
            let grid_path = artifact_path(out_dir, ALGORITHM_COMPARISON);
            {
                let root = SVGBackend::new(&grid_path, (1800, 1200)).into_drawing_area();
                root.fill(&WHITE)?;
                let root =
                    root.titled("IIoT Scheduler Algorithm Performance Comparison", TITLE_FONT)?;
                for (area, metric) in root.split_evenly((2, 3)).iter().zip(COMPARISON_METRICS) {
                    let groups = grouped_values(table, ALGORITHM, metric.column())?;
                    box_panel(area, metric.title(), metric.title(), &groups, false)?;
                }
                root.present()?;
            }
            written.push(grid_path);
        }
    }

    let bars_path = artifact_path(out_dir, AVERAGE_PERFORMANCE);
    average_performance(table, &bars_path)?;
    written.push(bars_path);

    Ok(ReportOutcome::Written(written))
}

fn average_performance(table: &ResultTable, path: &Path) -> Result<()> {
    let metrics: Vec<&str> = HEADLINE_METRICS.iter().map(|m| m.column()).collect();
    let stats = group_stats(table, ALGORITHM, &metrics, &[StatFn::Mean])?.sorted();
    let series: Vec<(&str, Vec<f64>)> = HEADLINE_METRICS
        .iter()
        .map(|m| {
            let means = stats.column(m.column(), StatFn::Mean).unwrap_or_default();
            (m.label(), normalize_by_peak(&means))
        })
        .collect();

    let root = SVGBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    grouped_bar_panel(
        &root,
        "Average Algorithm Performance (Normalized)",
        "Normalized Performance",
        stats.groups(),
        &series,
    )?;
    root.present()?;
    Ok(())
}

/// Divides by the largest absolute finite value; an all-zero series stays zero.
pub fn normalize_by_peak(values: &[f64]) -> Vec<f64> {
    let peak = values
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if peak == 0.0 {
        return values.iter().map(|v| if v.is_finite() { 0.0 } else { *v }).collect();
    }
    values.iter().map(|v| v / peak).collect()
}

/// Cost, makespan and hit rate by scenario, plus the algorithm × scenario cost heatmap.
pub fn scenario_analysis(tables: &TableSet, out_dir: &Path) -> Result<ReportOutcome> {
    info!("Creating scenario analysis plots...");
    let boxed = [Metric::TotalCost, Metric::Makespan, Metric::DeadlineHitRate];
    let mut columns = vec![ALGORITHM, SCENARIO];
    columns.extend(boxed.iter().map(|m| m.column()));
    let table = require_primary!(tables, &columns);

    let path = artifact_path(out_dir, SCENARIO_ANALYSIS);
    {
        let root = SVGBackend::new(&path, (1600, 1200)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled("Performance Analysis Across Scenarios", TITLE_FONT)?;
        let areas = root.split_evenly((2, 2));

        for (area, metric) in areas.iter().zip(boxed) {
            let groups = grouped_values(table, SCENARIO, metric.column())?;
            let title = format!("{} by Scenario", metric.label());
            box_panel(area, &title, metric.title(), &groups, false)?;
        }

        let costs = pivot(table, Metric::TotalCost.column(), ALGORITHM, SCENARIO, AggFn::Mean)?;
        pivot_heatmap(&areas[3], "Total Cost: Algorithm vs Scenario", &costs)?;

        root.present()?;
    }
    Ok(ReportOutcome::Written(vec![path]))
}

fn pivot_heatmap(area: &Area, title: &str, table: &PivotTable) -> Result<()> {
    let (min, max) = table.value_range().unwrap_or((0.0, 1.0));
    heatmap_panel(
        area,
        title,
        &table.rows,
        &table.columns,
        |r, c| table.cell(r, c),
        ColorScale::Sequential { min, max },
    )
}

/// Cost and execution time against task/node counts for the `Scalability` scenario.
pub fn scalability_analysis(tables: &TableSet, out_dir: &Path) -> Result<ReportOutcome> {
    info!("Creating scalability analysis plots...");
    let columns = [
        ALGORITHM,
        SCENARIO,
        TASK_COUNT,
        NODE_COUNT,
        Metric::TotalCost.column(),
        Metric::ExecutionTime.column(),
    ];
    let table = require_primary!(tables, &columns);

    let subset = table.filter_eq(SCENARIO, SCALABILITY_SCENARIO)?;
    if subset.height() == 0 {
        return Ok(ReportOutcome::Skipped("No scalability data found".to_string()));
    }

    // task, node, cost, time
    let groups = rows_by_group(&subset, ALGORITHM, &columns[2..])?;

    let path = artifact_path(out_dir, SCALABILITY_ANALYSIS);
    {
        let root = SVGBackend::new(&path, (1600, 1200)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled("Scalability Analysis", TITLE_FONT)?;
        let areas = root.split_evenly((2, 2));

        line_panel(
            &areas[0],
            "Cost vs Task Count",
            "Number of Tasks",
            Metric::TotalCost.title(),
            &xy_series(&groups, 0, 2),
            Marker::Circle,
        )?;
        line_panel(
            &areas[1],
            "Cost vs Node Count",
            "Number of Nodes",
            Metric::TotalCost.title(),
            &xy_series(&groups, 1, 2),
            Marker::Cross,
        )?;
        line_panel(
            &areas[2],
            "Execution Time vs Task Count",
            "Number of Tasks",
            Metric::ExecutionTime.title(),
            &xy_series(&groups, 0, 3),
            Marker::Triangle,
        )?;

        let points: Vec<(String, Vec<(f64, f64, f64)>)> = groups
            .iter()
            .map(|(name, rows)| (name.clone(), rows.iter().map(|r| (r[0], r[1], r[2])).collect()))
            .collect();
        scatter3d_panel(&areas[3], "3D: Tasks vs Nodes vs Cost", &points)?;

        root.present()?;
    }
    Ok(ReportOutcome::Written(vec![path]))
}

/// Full correlation heatmap, plus a scatter/density matrix of the four key metrics.
pub fn correlation_analysis(tables: &TableSet, out_dir: &Path) -> Result<ReportOutcome> {
    info!("Creating correlation analysis plots...");
    let table = require_primary!(tables, &CORRELATION_COLUMNS);

    let matrix = correlation_matrix(table, &CORRELATION_COLUMNS)?;
    let heatmap_path = artifact_path(out_dir, CORRELATION_MATRIX);
    {
        let root = SVGBackend::new(&heatmap_path, (1200, 1000)).into_drawing_area();
        root.fill(&WHITE)?;
        heatmap_panel(
            &root,
            "Metric Correlation Matrix",
            &matrix.columns,
            &matrix.columns,
            |r, c| Some(matrix.values[r][c]),
            ColorScale::Diverging { limit: 1.0 },
        )?;
        root.present()?;
    }
    let mut written = vec![heatmap_path];

    let key_metrics: Vec<&str> = SUMMARY_METRICS.iter().map(|m| m.column()).collect();
    let rows = complete_rows(table, &key_metrics)?;
    if rows.is_empty() {
        info!("No complete rows for the scatter matrix");
        return Ok(ReportOutcome::Written(written));
    }

    let scatter_path = artifact_path(out_dir, SCATTER_MATRIX);
    {
        let n = key_metrics.len();
        let root = SVGBackend::new(&scatter_path, (1200, 1200)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled("Key Metrics Scatter Plot Matrix", TITLE_FONT)?;
        let areas = root.split_evenly((n, n));
        for i in 0..n {
            for j in 0..n {
                let area = &areas[i * n + j];
                if i == j {
                    let values: Vec<f64> = rows.iter().map(|r| r[i]).collect();
                    kde_panel(area, key_metrics[i], &values)?;
                } else {
                    let points: Vec<(f64, f64)> = rows.iter().map(|r| (r[j], r[i])).collect();
                    scatter_panel(area, key_metrics[j], key_metrics[i], &points)?;
                }
            }
        }
        root.present()?;
    }
    written.push(scatter_path);

    Ok(ReportOutcome::Written(written))
}

/// Algorithm × scenario mean heatmaps for the four summary metrics.
pub fn performance_heatmaps(tables: &TableSet, out_dir: &Path) -> Result<ReportOutcome> {
    info!("Creating performance heatmaps...");
    let mut columns = vec![ALGORITHM, SCENARIO];
    columns.extend(SUMMARY_METRICS.iter().map(|m| m.column()));
    let table = require_primary!(tables, &columns);

    let path = artifact_path(out_dir, PERFORMANCE_HEATMAPS);
    {
        let root = SVGBackend::new(&path, (1600, 1200)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled("Performance Heatmaps: Algorithm vs Scenario", TITLE_FONT)?;

        for (area, metric) in root.split_evenly((2, 2)).iter().zip(SUMMARY_METRICS) {
            let means = pivot(table, metric.column(), ALGORITHM, SCENARIO, AggFn::Mean)?;
            pivot_heatmap(area, metric.title(), &means)?;
        }

        root.present()?;
    }
    Ok(ReportOutcome::Written(vec![path]))
}

/// Box plots with every observation overlaid, by algorithm.
pub fn statistical_summary_chart(table: &ResultTable, out_dir: &Path) -> Result<PathBuf> {
    let path = artifact_path(out_dir, STATISTICAL_SUMMARY);
    {
        let root = SVGBackend::new(&path, (1600, 1200)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled("Statistical Summary by Algorithm", TITLE_FONT)?;

        for (area, metric) in root.split_evenly((2, 2)).iter().zip(SUMMARY_METRICS) {
            let groups = grouped_values(table, ALGORITHM, metric.column())?;
            box_panel(area, metric.title(), metric.title(), &groups, true)?;
        }

        root.present()?;
    }
    Ok(path)
}

/// Complete rows of `columns` per group (first-appearance order).
fn rows_by_group(
    table: &ResultTable,
    key: &str,
    columns: &[&str],
) -> Result<Vec<(String, Vec<Vec<f64>>)>> {
    let keys = table.str_column(key)?;
    let data = columns
        .iter()
        .map(|c| table.float_column(c))
        .collect::<Result<Vec<_>>>()?;

    let mut groups: Vec<(String, Vec<Vec<f64>>)> = Vec::new();
    for (row, key) in keys.into_iter().enumerate() {
        let Some(key) = key else { continue };
        let Some(values) = complete(&data, row) else { continue };
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, rows)) => rows.push(values),
            None => groups.push((key, vec![values])),
        }
    }
    Ok(groups)
}

/// Rows where every one of `columns` holds a finite value.
fn complete_rows(table: &ResultTable, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let data = columns
        .iter()
        .map(|c| table.float_column(c))
        .collect::<Result<Vec<_>>>()?;
    Ok((0..table.height()).filter_map(|row| complete(&data, row)).collect())
}

fn complete(data: &[Vec<Option<f64>>], row: usize) -> Option<Vec<f64>> {
    data.iter()
        .map(|column| column.get(row).copied().flatten().filter(|v| v.is_finite()))
        .collect()
}

/// `(x, y)` line per group, ordered by x.
fn xy_series(groups: &[(String, Vec<Vec<f64>>)], x: usize, y: usize) -> Vec<(String, Vec<(f64, f64)>)> {
    groups
        .iter()
        .map(|(name, rows)| {
            let mut points: Vec<(f64, f64)> = rows.iter().map(|r| (r[x], r[y])).collect();
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            (name.clone(), points)
        })
        .collect()
}
