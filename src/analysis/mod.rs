//! Aggregation over loaded result tables: grouped statistics, pivots, correlations and
//! significance tests. Everything here is a pure function of an immutable table.

pub mod aggregate;
pub mod correlation;
pub mod significance;
