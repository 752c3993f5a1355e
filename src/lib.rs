//! # IIoT Scheduler Results Analysis
//!
//! Batch reporting over the CSV output of scheduling experiments, plus the converter
//! that turns a batch-task trace into a simulator workflow file.
//!
//! ## Pipeline
//! - **Loader** (`data`): every CSV in the results directory → named, immutable table.
//! - **Aggregator** (`analysis`): grouped stats, pivots, correlations, significance tests.
//! - **Chart Renderer** (`charts`): six SVG reports, each skipped when its inputs are absent.
//! - **Report Writer** (`report`): summary CSV, console leaderboard, run orchestration.
//!
//! ## Converter
//! - `convert`: headerless batch-task CSV → `TASK, ...` lines, and the workflow parser.

pub mod analysis;
pub mod charts;
pub mod convert;
pub mod data;
pub mod report;
pub mod utils;
