//! Headerless batch-task CSV → `TASK` lines.
//!
//! Columns are positional: 5 = start timestamp, 6 = end timestamp, 8 = CPU usage.
//! Every row becomes a task whose id is its row index, whose length is the
//! truncated CPU value × 1000, and whose deadline is `end - start`.
//!
//! The timestamp columns are typed as a whole: a single fractional cell makes every
//! deadline of the file a float. The whole input is converted before anything is written,
//! so a bad row never leaves a partial output behind.

use std::{
    fs::{self, File},
    io::{BufWriter, Read, Write},
    path::Path,
};
use csv::{ReaderBuilder, StringRecord};
use log::{info, warn};

use crate::convert::workflow::{Number, TaskDescriptor};
use crate::utils::error::ConvertError;

pub const START_COLUMN: usize = 5;
pub const END_COLUMN: usize = 6;
pub const CPU_COLUMN: usize = 8;

const INPUT_SIZE: u64 = 10;
const OUTPUT_SIZE: u64 = 10;
const PES: u32 = 1;
const COST: f64 = 0.1;

/// Numeric type of a whole input column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnKind {
    #[default]
    Integer,
    Float,
}

impl ColumnKind {
    /// `Float` as soon as one numeric cell of `column` is not an integer.
    pub fn of(records: &[StringRecord], column: usize) -> ColumnKind {
        let fractional = records
            .iter()
            .filter_map(|r| r.get(column).and_then(Number::parse))
            .any(|n| matches!(n, Number::Float(_)));
        if fractional { ColumnKind::Float } else { ColumnKind::Integer }
    }

    fn apply(self, value: Number) -> Number {
        match self {
            ColumnKind::Integer => value,
            ColumnKind::Float => Number::Float(value.as_f64()),
        }
    }
}

/// Kinds of the two timestamp columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampKinds {
    pub start: ColumnKind,
    pub end: ColumnKind,
}

impl TimestampKinds {
    pub fn from_records(records: &[StringRecord]) -> Self {
        Self {
            start: ColumnKind::of(records, START_COLUMN),
            end: ColumnKind::of(records, END_COLUMN),
        }
    }
}

/// Builds the task for row `row` of the batch table.
pub fn convert_record(
    row: usize,
    record: &StringRecord,
    kinds: TimestampKinds,
) -> Result<TaskDescriptor, ConvertError> {
    let cpu = field(row, record, CPU_COLUMN)?.as_f64();
    if !cpu.is_finite() {
        return Err(field_error(row, record, CPU_COLUMN));
    }
    // `as` saturates, so an out-of-range value overflows the multiplication below
    let length = (cpu.trunc() as i64)
        .checked_mul(1000)
        .ok_or_else(|| field_error(row, record, CPU_COLUMN))?;

    let start = kinds.start.apply(field(row, record, START_COLUMN)?);
    let end = kinds.end.apply(field(row, record, END_COLUMN)?);
    let deadline = end.minus(start);
    if deadline.as_f64() <= 0.0 {
        warn!("row {}: non-positive deadline {} passed through", row, deadline);
    }

    Ok(TaskDescriptor {
        id: row as u64,
        length,
        input_size: INPUT_SIZE,
        output_size: OUTPUT_SIZE,
        pes: PES,
        cost: COST,
        deadline,
    })
}

fn field(row: usize, record: &StringRecord, column: usize) -> Result<Number, ConvertError> {
    record
        .get(column)
        .and_then(Number::parse)
        .ok_or_else(|| field_error(row, record, column))
}

fn field_error(row: usize, record: &StringRecord, column: usize) -> ConvertError {
    ConvertError::Field {
        row,
        column,
        value: record.get(column).unwrap_or_default().to_string(),
    }
}

/// Converts `input` to `output`, one line per row; returns the number of tasks.
///
/// Nothing reaches `output` unless every row converts.
pub fn convert<R: Read, W: Write>(input: R, output: W) -> Result<usize, ConvertError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    let kinds = TimestampKinds::from_records(&records);

    let tasks = records
        .iter()
        .enumerate()
        .map(|(row, record)| convert_record(row, record, kinds))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = BufWriter::new(output);
    for task in &tasks {
        writeln!(out, "{}", task)?;
    }
    out.flush()?;
    Ok(tasks.len())
}

/// Converts the file at `input`; `output` is only created once the whole input converted.
pub fn convert_file(input: &Path, output: &Path) -> Result<usize, ConvertError> {
    let mut text = Vec::new();
    let count = convert(File::open(input)?, &mut text)?;
    fs::write(output, text)?;
    info!("Wrote {} tasks to {}", count, output.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn builds_the_task_line() {
        let row = record(&["a", "b", "c", "d", "e", "100", "220", "f", "5"]);
        let task = convert_record(0, &row, TimestampKinds::default()).unwrap();
        assert_eq!(task.to_string(), "TASK, 0, 5000, 10, 10, 1, 0.1, 120");
    }

    #[test]
    fn cpu_value_is_truncated() {
        let row = record(&["", "", "", "", "", "1.5", "3", "", "2.9"]);
        let task = convert_record(4, &row, TimestampKinds::default()).unwrap();
        assert_eq!(task.length, 2000);
        assert_eq!(task.deadline, Number::Float(1.5));
        assert_eq!(task.to_string(), "TASK, 4, 2000, 10, 10, 1, 0.1, 1.5");
    }

    #[test]
    fn oversized_cpu_value_is_rejected() {
        let row = record(&["", "", "", "", "", "1", "3", "", "1e300"]);
        assert!(matches!(
            convert_record(0, &row, TimestampKinds::default()).unwrap_err(),
            ConvertError::Field { column: 8, .. }
        ));
    }

    #[test]
    fn negative_deadline_passes_through() {
        let row = record(&["", "", "", "", "", "300", "220", "", "1"]);
        let task = convert_record(2, &row, TimestampKinds::default()).unwrap();
        assert_eq!(task.deadline, Number::Int(-80));
    }

    #[test]
    fn bad_field_names_row_and_column() {
        let kinds = TimestampKinds::default();
        let row = record(&["", "", "", "", "", "100", "220", "", "busy"]);
        let err = convert_record(7, &row, kinds).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Field { row: 7, column: 8, ref value } if value == "busy"
        ));

        let short = record(&["", "", "", "", "", "100"]);
        assert!(matches!(
            convert_record(0, &short, kinds).unwrap_err(),
            ConvertError::Field { column: 8, .. }
        ));
    }

    #[test]
    fn converts_every_row_in_order() {
        let input = "t1,j1,1,1,Terminated,100,220,x,5\n\
                     t2,j1,1,1,Terminated,150,160,x,2.5\n";
        let mut out = Vec::new();
        let n = convert(input.as_bytes(), &mut out).unwrap();

        assert_eq!(n, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "TASK, 0, 5000, 10, 10, 1, 0.1, 120\nTASK, 1, 2000, 10, 10, 1, 0.1, 10\n"
        );
    }

    #[test]
    fn one_fractional_timestamp_makes_every_deadline_a_float() {
        let input = "t1,j1,1,1,Terminated,100,220,x,5\n\
                     t2,j1,1,1,Terminated,1.5,3,x,2\n";
        let mut out = Vec::new();
        convert(input.as_bytes(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "TASK, 0, 5000, 10, 10, 1, 0.1, 120.0\nTASK, 1, 2000, 10, 10, 1, 0.1, 1.5\n"
        );
    }

    #[test]
    fn column_kind_ignores_other_columns() {
        let records = vec![
            record(&["", "", "", "", "", "100", "220", "", "0.5"]),
            record(&["", "", "", "", "", "150", "160.25", "", "2"]),
        ];
        let kinds = TimestampKinds::from_records(&records);
        assert_eq!(kinds.start, ColumnKind::Integer);
        assert_eq!(kinds.end, ColumnKind::Float);
    }

    #[test]
    fn failed_row_writes_nothing() {
        let input = "t1,j1,1,1,Terminated,100,220,x,5\n\
                     t2,j1,1,1,Terminated,,160,x,2\n";
        let mut out = Vec::new();
        let err = convert(input.as_bytes(), &mut out).unwrap_err();

        assert!(matches!(err, ConvertError::Field { row: 1, column: 5, .. }));
        assert!(out.is_empty());
    }
}
