//! Workflow text format understood by the scheduling simulator.
//!
//! ```text
//! # comment
//! TASK, <id>, <length>, <input size>, <output size>, <pes>, <cost>[, <deadline>]
//! DEP, <from>, <to>
//! ```
//!
//! Keywords are case-insensitive, blank lines and `#` lines are ignored, and so is any
//! line with an unknown keyword. A task without a deadline gets `length / 1000 + 3.0`.

use std::{fmt, str::FromStr};
use log::debug;

use crate::utils::error::ConvertError;

/// Numeric field that keeps the integer/float distinction of its source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(v) = text.parse::<i64>() {
            return Some(Number::Int(v));
        }
        text.parse::<f64>().ok().map(Number::Float)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Integer difference when both sides are integers, float otherwise.
    pub fn minus(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_sub(b) {
                Some(v) => Number::Int(v),
                None => Number::Float(a as f64 - b as f64),
            },
            (a, b) => Number::Float(a.as_f64() - b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => f.write_str(&float_repr(*v)),
        }
    }
}

/// Shortest round-trip form with a `.0` on whole values, `1e+16`-style exponents and
/// lower-case `nan`/`inf`, the notation the simulator's reader expects.
fn float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // Debug switches to exponent notation below 1e-4 and from 1e16 on
    let text = format!("{:?}", v);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

/// One `TASK` line.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDescriptor {
    pub id: u64,
    pub length: i64,
    pub input_size: u64,
    pub output_size: u64,
    pub pes: u32,
    pub cost: f64,
    pub deadline: Number,
}

impl TaskDescriptor {
    /// Deadline assumed for a task that does not state one.
    pub fn default_deadline(length: i64) -> Number {
        Number::Float(length as f64 / 1000.0 + 3.0)
    }
}

impl fmt::Display for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TASK, {}, {}, {}, {}, {}, {}, {}",
            self.id, self.length, self.input_size, self.output_size, self.pes, self.cost, self.deadline
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEntry {
    Task(TaskDescriptor),
    Dependency { from: u64, to: u64 },
}

impl fmt::Display for WorkflowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowEntry::Task(task) => write!(f, "{}", task),
            WorkflowEntry::Dependency { from, to } => write!(f, "DEP, {}, {}", from, to),
        }
    }
}

/// Parses a whole workflow file; line numbers in errors are 1-based.
pub fn parse_workflow(text: &str) -> Result<Vec<WorkflowEntry>, ConvertError> {
    let mut entries = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields = Fields::new(index + 1, line);

        if fields.keyword().eq_ignore_ascii_case("TASK") {
            let length = fields.parse(2, "length")?;
            let deadline = match fields.get(7) {
                Some(text) => Number::parse(text).ok_or_else(|| fields.invalid(7, "deadline"))?,
                None => TaskDescriptor::default_deadline(length),
            };
            entries.push(WorkflowEntry::Task(TaskDescriptor {
                id: fields.parse(1, "id")?,
                length,
                input_size: fields.parse(3, "input size")?,
                output_size: fields.parse(4, "output size")?,
                pes: fields.parse(5, "pes")?,
                cost: fields.parse(6, "cost")?,
                deadline,
            }));
        } else if fields.keyword().eq_ignore_ascii_case("DEP") {
            entries.push(WorkflowEntry::Dependency {
                from: fields.parse(1, "from")?,
                to: fields.parse(2, "to")?,
            });
        } else {
            debug!("line {}: ignoring '{}'", index + 1, fields.keyword());
        }
    }

    Ok(entries)
}

struct Fields<'a> {
    line: usize,
    parts: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(line: usize, text: &'a str) -> Self {
        Self {
            line,
            parts: text.split(',').map(str::trim).collect(),
        }
    }

    fn keyword(&self) -> &str {
        self.parts.first().copied().unwrap_or_default()
    }

    fn get(&self, index: usize) -> Option<&'a str> {
        self.parts.get(index).copied().filter(|s| !s.is_empty())
    }

    fn parse<T: FromStr>(&self, index: usize, name: &str) -> Result<T, ConvertError> {
        match self.get(index) {
            Some(text) => text.parse().map_err(|_| self.invalid(index, name)),
            None => Err(ConvertError::Workflow {
                line: self.line,
                reason: format!("missing {}", name),
            }),
        }
    }

    fn invalid(&self, index: usize, name: &str) -> ConvertError {
        ConvertError::Workflow {
            line: self.line,
            reason: format!("invalid {} '{}'", name, self.parts.get(index).copied().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn number_keeps_integer_formatting() {
        assert_eq!(Number::parse("220").unwrap().minus(Number::parse("100").unwrap()).to_string(), "120");
        assert_eq!(Number::parse("220.0").unwrap().minus(Number::Int(100)).to_string(), "120.0");
        assert_eq!(Number::Float(0.5).to_string(), "0.5");
        assert_eq!(Number::parse("abc"), None);
    }

    #[test]
    fn float_exponents_are_signed_and_padded() {
        assert_eq!(Number::Float(1e16).to_string(), "1e+16");
        assert_eq!(Number::Float(2.5e20).to_string(), "2.5e+20");
        assert_eq!(Number::Float(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Number::Float(1e-123).to_string(), "1e-123");
        assert_eq!(Number::Float(123456.0).to_string(), "123456.0");
        assert_eq!(Number::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Number::Float(f64::NEG_INFINITY).to_string(), "-inf");
    }

    #[test]
    fn parses_tasks_and_dependencies() {
        let text = "\
# two tasks
TASK, 0, 5000, 10, 10, 1, 0.1, 120

task, 1, 2000, 10, 10, 1, 0.1
Dep, 0, 1
NOTE, ignored
";
        let entries = parse_workflow(text).unwrap();
        assert_eq!(entries.len(), 3);

        let WorkflowEntry::Task(first) = &entries[0] else { panic!("expected task") };
        assert_eq!(first.length, 5000);
        assert_eq!(first.deadline, Number::Int(120));

        let WorkflowEntry::Task(second) = &entries[1] else { panic!("expected task") };
        assert_eq!(second.deadline, Number::Float(5.0));

        assert_eq!(entries[2], WorkflowEntry::Dependency { from: 0, to: 1 });
    }

    #[test]
    fn display_round_trips_a_task_line() {
        let line = "TASK, 3, 7000, 10, 10, 1, 0.1, -4.5";
        let entries = parse_workflow(line).unwrap();
        assert_eq!(entries[0].to_string(), line);
    }

    #[test]
    fn reports_the_offending_line() {
        let err = parse_workflow("TASK, 0, 10, 10, 10, 1, 0.1\nDEP, 0").unwrap_err();
        assert!(matches!(err, ConvertError::Workflow { line: 2, .. }));

        let err = parse_workflow("TASK, x, 10, 10, 10, 1, 0.1").unwrap_err();
        assert_eq!(err.to_string(), "line 1: invalid id 'x'");
    }
}
