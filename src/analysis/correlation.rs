//! Pearson correlation over numeric columns, pairwise-complete.

use statrs::statistics::Statistics;

use crate::data::loader::ResultTable;
use crate::utils::error::Result;

/// Symmetric matrix of pairwise Pearson coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Correlation of every pair in `columns`.
///
/// Undefined coefficients (zero variance, fewer than two complete pairs) are `NaN`.
pub fn correlation_matrix(table: &ResultTable, columns: &[&str]) -> Result<CorrelationMatrix> {
    table.require_columns(columns)?;
    let data = columns
        .iter()
        .map(|c| table.float_column(c))
        .collect::<Result<Vec<_>>>()?;

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = self_correlation(&data[i]);
        for j in (i + 1)..n {
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

/// Pearson coefficient over rows where both values are present and finite.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .unzip();

    if xs.len() < 2 {
        return f64::NAN;
    }

    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if sx == 0.0 || sy == 0.0 {
        return f64::NAN;
    }

    let r = xs.iter().covariance(ys.iter()) / (sx * sy);
    r.clamp(-1.0, 1.0)
}

fn self_correlation(x: &[Option<f64>]) -> f64 {
    let xs: Vec<f64> = x.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if xs.len() >= 2 && xs.iter().variance() > 0.0 {
        1.0
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table() -> ResultTable {
        let frame = df!(
            "TaskCount" => [10.0, 20.0, 30.0, 40.0],
            "TotalCost" => [1.0, 2.1, 2.9, 4.2],
            "Inverse" => [8.0, 6.0, 4.0, 2.0],
            "Constant" => [5.0, 5.0, 5.0, 5.0],
        )
        .unwrap();
        ResultTable::new("t", frame)
    }

    #[test]
    fn diagonal_is_one_for_varying_columns() {
        let m = correlation_matrix(&table(), &["TaskCount", "TotalCost", "Inverse"]).unwrap();
        for i in 0..m.len() {
            assert_eq!(m.values[i][i], 1.0);
        }
    }

    #[test]
    fn matrix_is_symmetric_and_signed() {
        let m = correlation_matrix(&table(), &["TaskCount", "TotalCost", "Inverse"]).unwrap();
        assert_eq!(m.get("TaskCount", "TotalCost"), m.get("TotalCost", "TaskCount"));
        assert!(m.get("TaskCount", "TotalCost").unwrap() > 0.99);
        assert!((m.get("TaskCount", "Inverse").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_is_nan_not_error() {
        let m = correlation_matrix(&table(), &["TaskCount", "Constant"]).unwrap();
        assert!(m.get("Constant", "Constant").unwrap().is_nan());
        assert!(m.get("TaskCount", "Constant").unwrap().is_nan());
    }

    #[test]
    fn pairwise_complete_observations() {
        let x = [Some(1.0), None, Some(3.0), Some(4.0)];
        let y = [Some(2.0), Some(100.0), Some(6.0), Some(8.0)];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!(pearson(&[Some(1.0)], &[Some(2.0)]).is_nan());
    }
}
