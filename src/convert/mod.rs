//! Batch-task CSV to simulator workflow conversion.
//!
//! - [`batch`]: reads the headerless batch-task table and emits one `TASK` line per row.
//! - [`workflow`]: the line format itself, in both directions.

pub mod batch;
pub mod workflow;
