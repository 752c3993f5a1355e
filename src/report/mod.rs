//! Report writing and the end-to-end pipeline.
//!
//! - [`writer`]: output directory, `statistical_summary.csv`, console table and leaderboard.
//! - [`significance`]: ANOVA and pairwise Welch tests per summary metric.
//! - [`pipeline`]: runs every report in order and tallies what happened.

pub mod pipeline;
pub mod significance;
pub mod writer;
