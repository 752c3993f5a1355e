//! Significance testing between algorithm groups.
//!
//! - One-way ANOVA: does any group mean differ?
//! - Welch's t-test per pair, judged at a Bonferroni-adjusted alpha.
//! - Cohen's d as the effect size of a pair.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use statrs::statistics::Statistics;

/// Family-wise significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// One-way ANOVA table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
}

impl AnovaResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// ANOVA over non-empty groups. `None` with fewer than two groups or no residual
/// degrees of freedom.
pub fn one_way_anova(groups: &[Vec<f64>]) -> Option<AnovaResult> {
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    let n: usize = groups.iter().map(|g| g.len()).sum();
    if k < 2 || n <= k {
        return None;
    }

    let overall_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let mean = group.iter().mean();
        ss_between += group.len() as f64 * (mean - overall_mean).powi(2);
        ss_within += group.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = n - k;
    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;
    let f_statistic = ms_between / ms_within;

    let p_value = if f_statistic.is_nan() {
        f64::NAN
    } else if f_statistic.is_infinite() {
        0.0
    } else {
        let dist = FisherSnedecor::new(df_between as f64, df_within as f64).ok()?;
        1.0 - dist.cdf(f_statistic)
    };

    Some(AnovaResult {
        f_statistic,
        p_value,
        df_between,
        df_within,
        ss_between,
        ss_within,
    })
}

/// Two-tailed p-value of Welch's unequal-variance t-test.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (v1, v2) = (a.iter().variance(), b.iter().variance());
    let se2 = v1 / n1 + v2 / n2;
    if se2 <= 0.0 {
        return None;
    }

    let t = (a.iter().mean() - b.iter().mean()) / se2.sqrt();
    let df = se2.powi(2) / ((v1 / n1).powi(2) / (n1 - 1.0) + (v2 / n2).powi(2) / (n2 - 1.0));

    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some(2.0 * (1.0 - dist.cdf(t.abs())))
}

/// Effect size with pooled standard deviation.
pub fn cohens_d(a: &[f64], b: &[f64]) -> f64 {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let pooled = (((n1 - 1.0) * a.iter().variance() + (n2 - 1.0) * b.iter().variance())
        / (n1 + n2 - 2.0))
        .sqrt();
    (a.iter().mean() - b.iter().mean()) / pooled
}

/// One pair of groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub first: String,
    pub second: String,
    pub mean_first: f64,
    pub mean_second: f64,
    pub p_value: Option<f64>,
    pub effect_size: f64,
    pub significant: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseComparisons {
    pub comparisons: Vec<Comparison>,
    pub adjusted_alpha: f64,
}

/// Welch's t-test for every unordered pair, Bonferroni-corrected.
pub fn pairwise_comparisons(groups: &[(String, Vec<f64>)]) -> PairwiseComparisons {
    let pairs = groups.len() * groups.len().saturating_sub(1) / 2;
    let adjusted_alpha = DEFAULT_ALPHA / pairs.max(1) as f64;

    let mut comparisons = Vec::with_capacity(pairs);
    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            let (first, a) = &groups[i];
            let (second, b) = &groups[j];
            let p_value = welch_t_test(a, b);
            comparisons.push(Comparison {
                first: first.clone(),
                second: second.clone(),
                mean_first: a.iter().mean(),
                mean_second: b.iter().mean(),
                p_value,
                effect_size: cohens_d(a, b),
                significant: p_value.is_some_and(|p| p < adjusted_alpha),
            });
        }
    }

    PairwiseComparisons {
        comparisons,
        adjusted_alpha,
    }
}
