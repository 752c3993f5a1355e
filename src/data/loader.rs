//! Result loading: every CSV directly inside the results directory becomes a named table.
//!
//! - Table name = file stem (`comprehensive_results.csv` → `comprehensive_results`).
//! - A file that fails to parse is logged and left out; the rest still load.
//! - A missing or empty directory yields an empty [`TableSet`], never an error.

use polars::prelude::*;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use log::{info, warn, error};

use crate::data::columns::PRIMARY_TABLE;
use crate::utils::error::{AnalysisError, Result};

/// Immutable table loaded from one result file.
#[derive(Debug, Clone)]
pub struct ResultTable {
    name: String,
    frame: DataFrame,
}

impl ResultTable {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self { name: name.into(), frame }
    }

    /// Parses a CSV file with a header row; column types are inferred.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let frame = LazyCsvReader::new(path)
            .with_has_header(true)
            .finish()?
            .collect()?;

        Ok(Self::new(name, frame))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Fails with [`AnalysisError::MissingColumn`] naming this table.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|n| !self.has_column(n)) {
            Some(missing) => Err(self.missing(missing)),
            None => Ok(()),
        }
    }

    /// Column cast to `f64`; nulls and unparsable cells stay `None`.
    pub fn float_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?.cast(&DataType::Float64)?;
        Ok(column.f64()?.into_iter().collect())
    }

    /// Column rendered as strings (categorical keys).
    pub fn str_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self.column(name)?.cast(&DataType::String)?;
        Ok(column.str()?.into_iter().map(|v| v.map(str::to_owned)).collect())
    }

    /// Rows whose `column` equals `value` (compared as strings).
    pub fn filter_eq(&self, column: &str, value: &str) -> Result<ResultTable> {
        self.require_columns(&[column])?;
        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(col(column).cast(DataType::String).eq(lit(value)))
            .collect()?;
        Ok(Self::new(self.name.clone(), frame))
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.frame.column(name).map_err(|_| self.missing(name))
    }

    fn missing(&self, column: &str) -> AnalysisError {
        AnalysisError::MissingColumn {
            table: self.name.clone(),
            column: column.to_string(),
        }
    }
}

/// Loaded tables keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: BTreeMap<String, ResultTable>,
}

impl TableSet {
    pub fn insert(&mut self, table: ResultTable) {
        self.tables.insert(table.name().to_string(), table);
    }

    pub fn get(&self, name: &str) -> Option<&ResultTable> {
        self.tables.get(name)
    }

    /// The `comprehensive_results` table every report reads from.
    pub fn primary(&self) -> Option<&ResultTable> {
        self.get(PRIMARY_TABLE)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A file that could not be parsed.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of scanning a results directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tables: TableSet,
    pub failures: Vec<LoadFailure>,
}

/// Loads every `*.csv` directly inside `dir` (no recursion).
pub fn load_tables(dir: &Path) -> LoadReport {
    info!("Loading results data from {}", dir.display());
    let mut report = LoadReport::default();

    let files = csv_files(dir);
    if files.is_empty() {
        warn!("No CSV files found in {}", dir.display());
        return report;
    }

    for path in files {
        match ResultTable::from_csv(&path) {
            Ok(table) => {
                info!("Loaded {}: {} records", table.name(), table.height());
                report.tables.insert(table);
            }
            Err(e) => {
                error!("Error loading {}: {}", path.display(), e);
                report.failures.push(LoadFailure {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

/// Regular files with a `csv` extension (any case), sorted by path.
fn csv_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read results directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;

    #[test]
    fn loads_each_csv_by_stem_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("makespan.csv"), "Algorithm,Makespan\nA,1.5\nB,2.5\n").unwrap();
        write(dir.path().join("notes.txt"), "not a table").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(dir.path().join("nested").join("inner.csv"), "x\n1\n").unwrap();

        let report = load_tables(dir.path());

        assert_eq!(report.tables.names().collect::<Vec<_>>(), vec!["makespan"]);
        assert_eq!(report.tables.get("makespan").unwrap().height(), 2);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn missing_directory_is_an_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let report = load_tables(&dir.path().join("does_not_exist"));
        assert!(report.tables.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn unparsable_file_is_reported_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("empty.csv"), "").unwrap();
        write(dir.path().join("good.csv"), "a,b\n1,2\n").unwrap();

        let report = load_tables(dir.path());

        assert!(report.tables.get("good").is_some());
        assert!(report.tables.get("empty").is_none());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("empty.csv"));
    }

    #[test]
    fn typed_access_and_filtering() {
        let frame = df!(
            "Scenario" => ["Scalability", "Urban", "Scalability"],
            "TaskCount" => [10i64, 20, 30],
        )
        .unwrap();
        let table = ResultTable::new("t", frame);

        let subset = table.filter_eq("Scenario", "Scalability").unwrap();
        assert_eq!(subset.height(), 2);
        assert_eq!(
            subset.float_column("TaskCount").unwrap(),
            vec![Some(10.0), Some(30.0)]
        );
        assert!(matches!(
            table.float_column("Nope"),
            Err(AnalysisError::MissingColumn { .. })
        ));
    }
}
