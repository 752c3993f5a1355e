//! Column names of the experiment results tables and per-metric display labels.

/// Name (file stem) of the primary results table.
pub const PRIMARY_TABLE: &str = "comprehensive_results";

pub const ALGORITHM: &str = "Algorithm";
pub const SCENARIO: &str = "Scenario";
pub const TASK_COUNT: &str = "TaskCount";
pub const NODE_COUNT: &str = "NodeCount";

/// Scenario label selecting the scalability sweep rows.
pub const SCALABILITY_SCENARIO: &str = "Scalability";

/// Floating-point metrics recorded per experiment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalCost,
    Makespan,
    DeadlineHitRate,
    ExecutionTime,
    EnergyConsumption,
    FogUtilization,
    CloudUtilization,
}

impl Metric {
    /// Column header in the results CSV.
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalCost => "TotalCost",
            Metric::Makespan => "Makespan",
            Metric::DeadlineHitRate => "DeadlineHitRate",
            Metric::ExecutionTime => "ExecutionTime",
            Metric::EnergyConsumption => "EnergyConsumption",
            Metric::FogUtilization => "FogUtilization",
            Metric::CloudUtilization => "CloudUtilization",
        }
    }

    /// Human-readable name without unit.
    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalCost => "Total Cost",
            Metric::Makespan => "Makespan",
            Metric::DeadlineHitRate => "Deadline Hit Rate",
            Metric::ExecutionTime => "Execution Time",
            Metric::EnergyConsumption => "Energy Consumption",
            Metric::FogUtilization => "Fog Utilization",
            Metric::CloudUtilization => "Cloud Utilization",
        }
    }

    /// Chart title with unit.
    pub fn title(self) -> &'static str {
        match self {
            Metric::TotalCost => "Total Cost ($)",
            Metric::Makespan => "Makespan (s)",
            Metric::DeadlineHitRate => "Deadline Hit Rate",
            Metric::ExecutionTime => "Execution Time (ms)",
            Metric::EnergyConsumption => "Energy (Wh)",
            Metric::FogUtilization => "Fog Utilization",
            Metric::CloudUtilization => "Cloud Utilization",
        }
    }
}

/// Metrics shown in the algorithm comparison grid (2x3).
pub const COMPARISON_METRICS: [Metric; 6] = [
    Metric::TotalCost,
    Metric::Makespan,
    Metric::DeadlineHitRate,
    Metric::ExecutionTime,
    Metric::EnergyConsumption,
    Metric::FogUtilization,
];

/// Metrics in the normalized average-performance bar chart.
pub const HEADLINE_METRICS: [Metric; 3] =
    [Metric::TotalCost, Metric::Makespan, Metric::DeadlineHitRate];

/// Metrics used by heatmaps, the statistical summary and the leaderboard.
pub const SUMMARY_METRICS: [Metric; 4] = [
    Metric::TotalCost,
    Metric::Makespan,
    Metric::DeadlineHitRate,
    Metric::ExecutionTime,
];

/// Numeric columns of the full correlation matrix.
pub const CORRELATION_COLUMNS: [&str; 9] = [
    TASK_COUNT,
    NODE_COUNT,
    "TotalCost",
    "Makespan",
    "DeadlineHitRate",
    "ExecutionTime",
    "EnergyConsumption",
    "FogUtilization",
    "CloudUtilization",
];
