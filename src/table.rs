//! Data type and methods to store a whitespace delimited table of observations.

use crate::error::{AnalysisError, Result};
use optional::Optioned;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};
use tracing::debug;

/// Name given to a leading column that has no name in the header line.
pub const INDEX_COLUMN: &str = "index";

/// A table of named columns.
///
/// The columns are stored in parallel vectors, all with the same length. Values that are missing
/// in the source file (empty, `NaN` or otherwise not a number) are stored as `none`.
#[derive(Clone, Debug, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<Optioned<f64>>>,
}

impl Table {
    /// Create a new, empty table. This is a proxy for default with a clearer name.
    #[inline]
    pub fn new() -> Self {
        Table::default()
    }

    /// Read a table from a whitespace delimited text file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)?;
        let table = Self::from_reader(BufReader::new(f))?;

        debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.names.len(),
            "loaded table"
        );

        Ok(table)
    }

    /// Read a table from any buffered reader.
    ///
    /// The first line that is not blank and not a `#` comment is the header. If the header names
    /// one column fewer than the data rows hold, the first column is taken to be an unnamed index
    /// and is given the name [`INDEX_COLUMN`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut names: Option<Vec<String>> = None;
        let mut columns: Vec<Vec<Optioned<f64>>> = vec![];

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();

            if names.is_none() {
                names = Some(
                    tokens
                        .iter()
                        .map(|tok| tok.trim_matches('"').to_owned())
                        .collect(),
                );
                continue;
            }
            let header = match names.as_mut() {
                Some(header) => header,
                None => continue,
            };

            if columns.is_empty() {
                if tokens.len() == header.len() + 1 {
                    header.insert(0, INDEX_COLUMN.to_owned());
                }
                columns = vec![Vec::new(); header.len()];
            }

            if tokens.len() != header.len() {
                return Err(AnalysisError::RowLength {
                    line: i + 1,
                    expected: header.len(),
                    found: tokens.len(),
                });
            }

            for (col, tok) in columns.iter_mut().zip(tokens) {
                col.push(parse_value(tok));
            }
        }

        let names = names.ok_or(AnalysisError::EmptyInput)?;
        if columns.is_empty() {
            columns = vec![Vec::new(); names.len()];
        }

        Ok(Table { names, columns })
    }

    /// The number of rows in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.first().map(|col| col.len()).unwrap_or(0)
    }

    /// True if there are no rows in the table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The names of the columns, in file order.
    #[inline]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// True if the table has a column with this name.
    #[inline]
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Result<&[Optioned<f64>]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_owned()))
    }

    /// Get a column by position.
    pub fn column_at(&self, idx: usize) -> Result<&[Optioned<f64>]> {
        self.columns
            .get(idx)
            .map(|col| col.as_slice())
            .ok_or_else(|| AnalysisError::MissingColumn(format!("#{}", idx)))
    }

    /// Builder method to add a column, or replace a column with the same name.
    ///
    /// The first column added to an empty table sets the number of rows, every later column must
    /// have the same length.
    pub fn with_column<S: Into<String>>(
        mut self,
        name: S,
        values: Vec<Optioned<f64>>,
    ) -> Result<Self> {
        let name = name.into();

        if !self.columns.is_empty() && values.len() != self.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "column {} has {} values, table has {} rows",
                name,
                values.len(),
                self.len()
            )));
        }

        match self.names.iter().position(|n| *n == name) {
            Some(i) => self.columns[i] = values,
            None => {
                self.names.push(name);
                self.columns.push(values);
            }
        }

        Ok(self)
    }

    /// Builder method to remove columns. Names that are not in the table are ignored.
    pub fn without_columns(mut self, to_remove: &[&str]) -> Self {
        let (names, columns) = self
            .names
            .drain(..)
            .zip(self.columns.drain(..))
            .filter(|(name, _)| !to_remove.contains(&name.as_str()))
            .unzip();

        Table { names, columns }
    }

    /// Create a new table holding only the rows at `rows`, in that order.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|col| rows.iter().map(|&r| col[r]).collect())
            .collect();

        Table {
            names: self.names.clone(),
            columns,
        }
    }

    /// Indexes of the rows that have no missing values.
    pub fn complete_rows(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&r| self.columns.iter().all(|col| col[r].is_some()))
            .collect()
    }

    /// Create a new table without any row that has a missing value.
    pub fn drop_missing_rows(&self) -> Table {
        self.select_rows(&self.complete_rows())
    }
}

// Anything that doesn't parse as a number is a missing value.
fn parse_value(token: &str) -> Optioned<f64> {
    Optioned::from(f64::from_str(token).ok().filter(|v| !v.is_nan()))
}
