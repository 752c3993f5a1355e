//! Error types shared by the loader, aggregator, renderer and converter.
//!
//! Recoverable conditions (missing tables, missing scenario rows) are not errors:
//! reports model them as skips. These enums cover what actually went wrong.

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Failure inside the reporting pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataframe error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("rendering failed: {0}")]
    Render(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for AnalysisError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        AnalysisError::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failure while converting a batch-task table into a workflow description.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: column {column} is {value:?}, expected a number")]
    Field {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("line {line}: {reason}")]
    Workflow { line: usize, reason: String },
}
