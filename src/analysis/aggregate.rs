//! Grouped statistics, pivot tables and "best group" selection over a [`ResultTable`].
//!
//! Grouping is delegated to polars (`group_by_stable`), so group order is the order in which
//! each key first appears in the table; [`GroupStats::sorted`] reorders by label for
//! presentation. Standard deviation is the sample estimate
//! (`ddof = 1`); a group with a single row has an undefined (`NaN`) deviation.

use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};

use crate::data::loader::ResultTable;
use crate::utils::error::Result;

/// Per-group statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatFn {
    Mean,
    Std,
    Min,
    Max,
}

impl StatFn {
    pub const ALL: [StatFn; 4] = [StatFn::Mean, StatFn::Std, StatFn::Min, StatFn::Max];

    pub fn label(self) -> &'static str {
        match self {
            StatFn::Mean => "mean",
            StatFn::Std => "std",
            StatFn::Min => "min",
            StatFn::Max => "max",
        }
    }

    fn expr(self, metric: &str) -> Expr {
        let value = col(metric).cast(DataType::Float64);
        let agg = match self {
            StatFn::Mean => value.mean(),
            StatFn::Std => value.std(1),
            StatFn::Min => value.min(),
            StatFn::Max => value.max(),
        };
        agg.alias(stat_alias(metric, self))
    }
}

fn stat_alias(metric: &str, stat: StatFn) -> String {
    format!("{}_{}", metric, stat.label())
}

/// Statistics of several metrics, grouped by one categorical key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    group_key: String,
    groups: Vec<String>,
    stats: Vec<StatFn>,
    // (metric, values[group][stat])
    metrics: Vec<(String, Vec<Vec<f64>>)>,
}

impl GroupStats {
    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    /// Group labels, in first-appearance order unless [`sorted`](Self::sorted).
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn stats(&self) -> &[StatFn] {
        &self.stats
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|(m, _)| m.as_str())
    }

    pub fn get(&self, metric: &str, group: &str, stat: StatFn) -> Option<f64> {
        let g = self.groups.iter().position(|name| name == group)?;
        let s = self.stats.iter().position(|&x| x == stat)?;
        let (_, values) = self.metrics.iter().find(|(m, _)| m == metric)?;
        Some(values[g][s])
    }

    /// Same statistics with groups in lexicographic label order.
    pub fn sorted(mut self) -> GroupStats {
        let mut order: Vec<usize> = (0..self.groups.len()).collect();
        order.sort_by(|&a, &b| self.groups[a].cmp(&self.groups[b]));

        let groups = order.iter().map(|&i| self.groups[i].clone()).collect();
        self.groups = groups;
        for (_, values) in &mut self.metrics {
            let reordered = order.iter().map(|&i| values[i].clone()).collect();
            *values = reordered;
        }
        self
    }

    /// One statistic of one metric for every group, in group order.
    pub fn column(&self, metric: &str, stat: StatFn) -> Option<Vec<f64>> {
        let s = self.stats.iter().position(|&x| x == stat)?;
        let (_, values) = self.metrics.iter().find(|(m, _)| m == metric)?;
        Some(values.iter().map(|row| row[s]).collect())
    }
}

/// Groups `table` by `group_key` and computes `stats` for each of `metrics`.
///
/// Rows with a null key are ignored. Undefined statistics are `NaN`.
pub fn group_stats(
    table: &ResultTable,
    group_key: &str,
    metrics: &[&str],
    stats: &[StatFn],
) -> Result<GroupStats> {
    let mut required = vec![group_key];
    required.extend_from_slice(metrics);
    table.require_columns(&required)?;

    let aggs: Vec<Expr> = metrics
        .iter()
        .flat_map(|m| stats.iter().map(move |s| s.expr(m)))
        .collect();

    let out = table
        .frame()
        .clone()
        .lazy()
        .filter(col(group_key).is_not_null())
        .group_by_stable([col(group_key)])
        .agg(aggs)
        .collect()?;

    let groups = string_values(out.column(group_key)?)?;

    let mut by_metric = Vec::with_capacity(metrics.len());
    for &metric in metrics {
        let mut columns = Vec::with_capacity(stats.len());
        for &stat in stats {
            columns.push(float_values(out.column(&stat_alias(metric, stat))?)?);
        }
        let per_group = (0..groups.len())
            .map(|g| columns.iter().map(|c| c[g]).collect())
            .collect();
        by_metric.push((metric.to_string(), per_group));
    }

    Ok(GroupStats {
        group_key: group_key.to_string(),
        groups,
        stats: stats.to_vec(),
        metrics: by_metric,
    })
}

fn string_values(column: &Column) -> Result<Vec<String>> {
    let column = column.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

fn float_values(column: &Column) -> Result<Vec<f64>> {
    let column = column.cast(&DataType::Float64)?;
    Ok(column
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Cell aggregation for [`pivot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggFn {
    #[default]
    Mean,
    Sum,
    Min,
    Max,
}

impl AggFn {
    fn expr(self, metric: &str) -> Expr {
        let value = col(metric).cast(DataType::Float64);
        match self {
            AggFn::Mean => value.mean(),
            AggFn::Sum => value.sum(),
            AggFn::Min => value.min(),
            AggFn::Max => value.max(),
        }
        .alias(PIVOT_VALUE)
    }
}

const PIVOT_VALUE: &str = "__pivot_value";

/// Cross-tabulation of one metric by two categorical keys.
///
/// Labels are sorted; a combination absent from the source table is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub value_metric: String,
    pub row_key: String,
    pub col_key: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row)?.get(column).copied().flatten()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|x| x == row)?;
        let c = self.columns.iter().position(|x| x == column)?;
        self.cell(r, c)
    }

    /// (row, column) labels of every populated cell.
    pub fn populated_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, column) in self.columns.iter().enumerate() {
                if self.cell(r, c).is_some() {
                    pairs.push((row.clone(), column.clone()));
                }
            }
        }
        pairs
    }

    /// Smallest and largest finite cell value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

/// Pivots `value_metric` with `row_key` values as rows and `col_key` values as columns.
pub fn pivot(
    table: &ResultTable,
    value_metric: &str,
    row_key: &str,
    col_key: &str,
    agg: AggFn,
) -> Result<PivotTable> {
    table.require_columns(&[value_metric, row_key, col_key])?;

    let out = table
        .frame()
        .clone()
        .lazy()
        .filter(col(row_key).is_not_null().and(col(col_key).is_not_null()))
        .group_by_stable([col(row_key), col(col_key)])
        .agg([agg.expr(value_metric)])
        .collect()?;

    let row_labels = string_values(out.column(row_key)?)?;
    let col_labels = string_values(out.column(col_key)?)?;
    let values = out
        .column(PIVOT_VALUE)?
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .collect::<Vec<Option<f64>>>();

    let rows: Vec<String> = row_labels.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
    let columns: Vec<String> = col_labels.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
    let row_index: HashMap<&str, usize> = rows.iter().enumerate().map(|(i, r)| (r.as_str(), i)).collect();
    let col_index: HashMap<&str, usize> = columns.iter().enumerate().map(|(i, c)| (c.as_str(), i)).collect();

    let mut cells = vec![vec![None; columns.len()]; rows.len()];
    for ((r, c), v) in row_labels.iter().zip(&col_labels).zip(values) {
        cells[row_index[r.as_str()]][col_index[c.as_str()]] = v.filter(|x| !x.is_nan());
    }

    Ok(PivotTable {
        value_metric: value_metric.to_string(),
        row_key: row_key.to_string(),
        col_key: col_key.to_string(),
        rows,
        columns,
        cells,
    })
}

/// Whether the best group has the lowest or the highest mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Min,
    Max,
}

/// Group whose mean `metric` is lowest (`Min`) or highest (`Max`).
///
/// Ties keep the group that appears first in the table. `None` when no group has a
/// finite mean.
pub fn best_by_metric(
    table: &ResultTable,
    group_key: &str,
    metric: &str,
    direction: Direction,
) -> Result<Option<String>> {
    let stats = group_stats(table, group_key, &[metric], &[StatFn::Mean])?;
    let means = stats.column(metric, StatFn::Mean).unwrap_or_default();

    let mut best: Option<(usize, f64)> = None;
    for (i, &mean) in means.iter().enumerate() {
        if !mean.is_finite() {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, current)) => match direction {
                Direction::Min => mean < current,
                Direction::Max => mean > current,
            },
        };
        if better {
            best = Some((i, mean));
        }
    }

    Ok(best.map(|(i, _)| stats.groups()[i].clone()))
}

/// Raw values of `metric` per group (first-appearance order), nulls dropped.
pub fn grouped_values(
    table: &ResultTable,
    group_key: &str,
    metric: &str,
) -> Result<Vec<(String, Vec<f64>)>> {
    let keys = table.str_column(group_key)?;
    let values = table.float_column(metric)?;

    let mut order: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        let Some(key) = key else { continue };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            order.push((key, Vec::new()));
            order.len() - 1
        });
        if let Some(v) = value.filter(|v| v.is_finite()) {
            order[slot].1.push(v);
        }
    }
    Ok(order)
}
