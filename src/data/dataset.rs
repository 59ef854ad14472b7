//! Tabular participant data: one row per participant, named columns.

use crate::error::{CorrmatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Cell tokens treated as missing when loading a table.
const MISSING_TOKENS: [&str; 5] = ["", "NA", "na", "NaN", "nan"];

/// The kind of values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// A single column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric values; missing entries are NaN.
    Numeric(Vec<f64>),
    /// Categorical labels; missing entries are `None`.
    Categorical(Vec<Option<String>>),
}

impl Column {
    /// Build a categorical column from labels with no missing entries.
    pub fn categorical<S: AsRef<str>>(labels: &[S]) -> Self {
        Column::Categorical(labels.iter().map(|s| Some(s.as_ref().to_string())).collect())
    }

    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Numeric(_) => ColumnType::Numeric,
            Column::Categorical(_) => ColumnType::Categorical,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Try to get the values of a numeric column.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Categorical(_) => None,
        }
    }

    /// Try to get the labels of a categorical column.
    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Categorical(v) => Some(v),
            Column::Numeric(_) => None,
        }
    }

    /// Label of a row as used in group keys, or `None` when missing.
    ///
    /// Integral numbers print without a fractional part (`1`, not `1.0`).
    pub fn label(&self, row: usize) -> Option<String> {
        match self {
            Column::Numeric(v) => {
                let x = v[row];
                if x.is_nan() {
                    None
                } else if x.fract() == 0.0 && x.abs() < 1e15 {
                    Some(format!("{}", x as i64))
                } else {
                    Some(x.to_string())
                }
            }
            Column::Categorical(v) => v[row].clone(),
        }
    }

    /// Copy the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&r| v[r]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(rows.iter().map(|&r| v[r].clone()).collect())
            }
        }
    }
}

/// An ordered table of named columns sharing one row count.
///
/// Column order is insertion order. All operations return new tables; a
/// `Dataset` is never modified behind the caller's back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Column names in order.
    column_names: Vec<String>,
    /// Column data keyed by name.
    columns: HashMap<String, Column>,
    /// Number of rows (participants).
    n_rows: usize,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from `(name, column)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for (name, column) in columns {
            let name = name.into();
            if dataset.has_column(&name) {
                return Err(CorrmatError::DuplicateColumn(name));
            }
            dataset = dataset.with_column(name, column)?;
        }
        Ok(dataset)
    }

    /// Return a copy with `column` added, or replacing an existing column of
    /// the same name in place.
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column) -> Result<Self> {
        let name = name.into();
        if self.column_names.is_empty() {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(CorrmatError::DimensionMismatch {
                column: name,
                expected: self.n_rows,
                actual: column.len(),
            });
        }
        if !self.columns.contains_key(&name) {
            self.column_names.push(name.clone());
        }
        self.columns.insert(name, column);
        Ok(self)
    }

    /// Load a dataset from a comma-separated file with a header row.
    ///
    /// A column is numeric when every non-missing cell parses as a number,
    /// otherwise categorical. Empty cells, `NA` and `NaN` count as missing.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a dataset from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();
        if header.is_empty() {
            return Err(CorrmatError::EmptyData("No columns in table".to_string()));
        }

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); header.len()];
        for record in rdr.records() {
            let record = record?;
            for (col_idx, cell) in record.iter().enumerate() {
                raw[col_idx].push(cell.to_string());
            }
        }

        if raw[0].is_empty() {
            return Err(CorrmatError::EmptyData("No participants in table".to_string()));
        }

        let columns = header
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| (name, parse_column(cells)));
        let dataset = Self::from_columns(columns)?;

        log::debug!(
            "Loaded table with {} rows x {} columns",
            dataset.n_rows(),
            dataset.n_columns()
        );
        Ok(dataset)
    }

    /// Column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Look up a column by name, failing if it is absent.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| CorrmatError::MissingColumns(vec![name.to_string()]))
    }

    /// Values of a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        self.column(name)?
            .as_numeric()
            .ok_or_else(|| CorrmatError::NonNumeric(vec![name.to_string()]))
    }

    /// Type of a column, if present.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).map(Column::column_type)
    }

    /// New dataset holding only `names`, in that order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut selected = Self::new();
        for name in names {
            let name = name.as_ref();
            let column = self.column(name)?.clone();
            selected = selected.with_column(name, column)?;
        }
        if names.is_empty() {
            selected.n_rows = self.n_rows;
        }
        Ok(selected)
    }

    /// New dataset holding only the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .column_names
            .iter()
            .map(|name| (name.clone(), self.columns[name].select_rows(rows)))
            .collect();
        Self {
            column_names: self.column_names.clone(),
            columns,
            n_rows: rows.len(),
        }
    }

    /// New dataset without the named column (a no-op copy if absent).
    pub fn without_column(&self, name: &str) -> Self {
        let mut out = self.clone();
        if out.columns.remove(name).is_some() {
            out.column_names.retain(|n| n != name);
        }
        out
    }

    /// New dataset whose column names have `suffix` removed where present.
    ///
    /// Fails if stripping makes two names collide.
    pub fn strip_column_suffix(&self, suffix: &str) -> Result<Self> {
        let columns = self.column_names.iter().map(|name| {
            let stripped = name.strip_suffix(suffix).unwrap_or(name).to_string();
            (stripped, self.columns[name].clone())
        });
        let mut out = Self::from_columns(columns)?;
        out.n_rows = self.n_rows;
        Ok(out)
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

/// Infer a column's type from its raw cells and convert.
fn parse_column(cells: Vec<String>) -> Column {
    let all_numeric = cells
        .iter()
        .all(|c| is_missing(c) || c.parse::<f64>().is_ok());

    if all_numeric {
        Column::Numeric(
            cells
                .iter()
                .map(|c| {
                    if is_missing(c) {
                        f64::NAN
                    } else {
                        c.parse::<f64>().unwrap_or(f64::NAN)
                    }
                })
                .collect(),
        )
    } else {
        Column::Categorical(
            cells
                .into_iter()
                .map(|c| if is_missing(&c) { None } else { Some(c) })
                .collect(),
        )
    }
}
