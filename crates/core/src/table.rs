//! Schema-less tabular input.
//!
//! Rows are `serde_json::Map`s keyed by column name, the same shape the
//! import pipeline hands to validators. A cell that is absent from a row is
//! read as `null`. Rules never mutate a [`Table`]; they coerce into their own
//! working vectors.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigurationError;

/// One record, keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// A named collection of rows with a declared column list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table column-by-column.
    ///
    /// Every column must hold the same number of values; the first column
    /// sets the row count.
    pub fn from_columns<I, C>(name: impl Into<String>, columns: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (C, Vec<Value>)>,
        C: Into<String>,
    {
        let name = name.into();
        let mut table = Table {
            name,
            columns: Vec::new(),
            rows: Vec::new(),
        };
        let mut expected: Option<usize> = None;

        for (column, values) in columns {
            let column = column.into();
            let expected_len = *expected.get_or_insert(values.len());
            if values.len() != expected_len {
                return Err(ConfigurationError::RaggedColumns {
                    table: table.name,
                    column,
                    expected: expected_len,
                    actual: values.len(),
                });
            }
            if table.rows.is_empty() {
                table.rows = vec![Row::new(); expected_len];
            }
            for (row, value) in table.rows.iter_mut().zip(values) {
                row.insert(column.clone(), value);
            }
            table.columns.push(column);
        }

        Ok(table)
    }

    /// Build a table from rows. Columns are collected in first-seen order.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        let mut table = Table {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row, registering any column not seen before.
    pub fn push_row(&mut self, row: Row) {
        for key in row.keys() {
            if !self.has_column(key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with [`ConfigurationError::MissingColumn`] on the first required
    /// column the table does not declare.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), ConfigurationError> {
        match required.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(ConfigurationError::MissingColumn {
                table: self.name.clone(),
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Cells of one column, in row order. Absent cells yield `None`.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Copy of this table without the rows at the given indices.
    pub fn without_rows(&self, indices: &[usize]) -> Table {
        let drop: HashSet<usize> = indices.iter().copied().collect();
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, _)| !drop.contains(i))
                .map(|(_, row)| row.clone())
                .collect(),
        }
    }
}

/// Largest magnitude at which every integral `f64` is exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Textual form of a key cell (farmer id, season, crop).
///
/// Strings are taken as-is. Integral floats render without a fraction so
/// `1001.0` and `1001` give the same key; other scalars use their JSON
/// rendering. `null` and absent cells are undefined.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}
