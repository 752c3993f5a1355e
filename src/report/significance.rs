//! Significance of algorithm differences per summary metric.
//!
//! One-way ANOVA across all algorithms, then Welch's t-test for every pair at a
//! Bonferroni-adjusted alpha. Results are printed and written to `significance_tests.csv`.

use std::{fs::File, io::Write, path::Path};
use log::info;

use crate::analysis::{
    aggregate::grouped_values,
    significance::{
        AnovaResult, DEFAULT_ALPHA, PairwiseComparisons, one_way_anova, pairwise_comparisons,
    },
};
use crate::charts::{ReportOutcome, primary_table};
use crate::data::{
    columns::{ALGORITHM, SUMMARY_METRICS},
    loader::TableSet,
};
use crate::utils::error::Result;

pub const SIGNIFICANCE_CSV: &str = "significance_tests.csv";

// Statistic is F for ANOVA rows; EffectSize is Cohen's d for pairwise rows.
const HEADER: [&str; 8] = [
    "Metric", "Test", "Groups", "Statistic", "EffectSize", "PValue", "Alpha", "Significant",
];

/// Test outcome for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSignificance {
    pub metric: String,
    pub anova: Option<AnovaResult>,
    pub pairwise: PairwiseComparisons,
}

pub fn significance_tests(tables: &TableSet, out_dir: &Path) -> Result<ReportOutcome> {
    info!("Running significance tests...");
    let mut columns = vec![ALGORITHM];
    columns.extend(SUMMARY_METRICS.iter().map(|m| m.column()));
    let table = match primary_table(tables, &columns) {
        Ok(table) => table,
        Err(skip) => return Ok(skip),
    };

    let mut results = Vec::with_capacity(SUMMARY_METRICS.len());
    for metric in SUMMARY_METRICS {
        let groups: Vec<(String, Vec<f64>)> = grouped_values(table, ALGORITHM, metric.column())?
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .collect();
        let samples: Vec<Vec<f64>> = groups.iter().map(|(_, v)| v.clone()).collect();

        results.push(MetricSignificance {
            metric: metric.column().to_string(),
            anova: one_way_anova(&samples),
            pairwise: pairwise_comparisons(&groups),
        });
    }

    println!("\nSignificance Tests (alpha = {}):", DEFAULT_ALPHA);
    for result in &results {
        print_metric(result);
    }

    let path = out_dir.join(SIGNIFICANCE_CSV);
    write_significance_csv(&results, File::create(&path)?)?;
    Ok(ReportOutcome::Written(vec![path]))
}

fn print_metric(result: &MetricSignificance) {
    match &result.anova {
        Some(anova) => println!(
            "{}: F({}, {}) = {:.4}, p = {:.4}{}",
            result.metric,
            anova.df_between,
            anova.df_within,
            anova.f_statistic,
            anova.p_value,
            if anova.is_significant(DEFAULT_ALPHA) { " *" } else { "" }
        ),
        None => println!("{}: ANOVA not applicable", result.metric),
    }
    for c in &result.pairwise.comparisons {
        let p = c.p_value.map_or_else(|| "n/a".to_string(), |p| format!("{:.4}", p));
        println!(
            "  {} vs {}: p = {}, d = {:.3}{}",
            c.first,
            c.second,
            p,
            c.effect_size,
            if c.significant { " *" } else { "" }
        );
    }
}

/// One ANOVA row then one row per pair, for every metric.
pub fn write_significance_csv<W: Write>(results: &[MetricSignificance], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;

    for result in results {
        if let Some(anova) = &result.anova {
            writer.write_record([
                result.metric.clone(),
                "ANOVA".to_string(),
                "all".to_string(),
                number(anova.f_statistic),
                String::new(),
                number(anova.p_value),
                number(DEFAULT_ALPHA),
                anova.is_significant(DEFAULT_ALPHA).to_string(),
            ])?;
        }
        for c in &result.pairwise.comparisons {
            writer.write_record([
                result.metric.clone(),
                "Welch".to_string(),
                format!("{} vs {}", c.first, c.second),
                String::new(),
                number(c.effect_size),
                c.p_value.map(number).unwrap_or_default(),
                number(result.pairwise.adjusted_alpha),
                c.significant.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn number(v: f64) -> String {
    if v.is_finite() { format!("{:.6}", v) } else { String::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::significance::Comparison;
    use pretty_assertions::assert_eq;

    #[test]
    fn csv_has_anova_then_pairs() {
        let groups = vec![
            ("A".to_string(), vec![1.0, 1.1, 0.9]),
            ("B".to_string(), vec![5.0, 5.1, 4.9]),
        ];
        let samples: Vec<Vec<f64>> = groups.iter().map(|(_, v)| v.clone()).collect();
        let results = vec![MetricSignificance {
            metric: "TotalCost".into(),
            anova: one_way_anova(&samples),
            pairwise: pairwise_comparisons(&groups),
        }];

        let mut buf = Vec::new();
        write_significance_csv(&results, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Metric,Test,Groups,Statistic,EffectSize,PValue,Alpha,Significant");
        assert!(lines[1].starts_with("TotalCost,ANOVA,all,"));
        assert!(lines[1].ends_with(",true"));
        assert!(lines[2].starts_with("TotalCost,Welch,A vs B,"));
    }

    #[test]
    fn undefined_p_value_is_blank() {
        let results = vec![MetricSignificance {
            metric: "Makespan".into(),
            anova: None,
            pairwise: PairwiseComparisons {
                comparisons: vec![Comparison {
                    first: "A".into(),
                    second: "B".into(),
                    mean_first: 1.0,
                    mean_second: 1.0,
                    p_value: None,
                    effect_size: f64::NAN,
                    significant: false,
                }],
                adjusted_alpha: 0.05,
            },
        }];

        let mut buf = Vec::new();
        write_significance_csv(&results, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(1), Some("Makespan,Welch,A vs B,,,,0.050000,false"));
    }
}
