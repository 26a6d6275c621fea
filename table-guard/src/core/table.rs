//! Normalized in-memory tables and tagged cell values.
//!
//! Loaders resolve every cell into a [`CellValue`] once, so the engine only
//! ever pattern-matches on the tag and never inspects file formats.

use crate::prelude::*;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

/// A single cell, tagged with the type the loader resolved it to.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing or empty cell
    Null,
    /// Whole number
    Integer(i64),
    /// Real number (never NaN, see [`CellValue::real`])
    Real(f64),
    /// Boolean flag
    Boolean(bool),
    /// Free text (never empty, see [`CellValue::text`])
    Text(String),
    /// Calendar date
    Date(NaiveDate),
}

impl CellValue {
    /// Creates a text cell. Empty and whitespace-only text is a null cell.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Null
        } else {
            Self::Text(value)
        }
    }

    /// Creates a real cell. NaN is a null cell.
    pub fn real(value: f64) -> Self {
        if value.is_nan() {
            Self::Null
        } else {
            Self::Real(value)
        }
    }

    /// Returns true for the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the tag, used in type-mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Boolean(_) => "boolean",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
        }
    }

    /// The original value rendered as text, or `None` for null cells.
    pub fn as_text(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::real(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// An ordered set of named columns of equal length.
///
/// Construction goes through [`Table::builder`], which rejects duplicate
/// column names and columns of differing lengths.
///
/// # Examples
///
/// ```rust
/// use table_guard::core::{CellValue, Table};
///
/// let table = Table::builder()
///     .column("id", vec![1i64, 2, 3])
///     .column("email", vec!["a@b.com", "", "c@d.com"])
///     .build()
///     .unwrap();
///
/// assert_eq!(table.num_rows(), 3);
/// assert_eq!(table.column("email").unwrap()[1], CellValue::Null);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: HashMap<String, Vec<CellValue>>,
    num_rows: usize,
}

impl Table {
    /// Creates a new table builder.
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Column names in their original order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Returns the cells of a column, or `None` if the table has no such column.
    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Returns true if the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.names.len()
    }
}

/// Builder for [`Table`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<(String, Vec<CellValue>)>,
}

impl TableBuilder {
    /// Appends a column.
    pub fn column<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.columns
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Appends a column of already-tagged cells.
    pub fn cells(mut self, name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        self.columns.push((name.into(), cells));
        self
    }

    /// Builds the table.
    pub fn build(self) -> Result<Table> {
        let num_rows = self.columns.first().map_or(0, |(_, cells)| cells.len());
        let mut names = Vec::with_capacity(self.columns.len());
        let mut columns = HashMap::with_capacity(self.columns.len());

        for (name, cells) in self.columns {
            if cells.len() != num_rows {
                return Err(TableGuardError::data_source(
                    "table",
                    format!(
                        "column '{name}' has {} rows, expected {num_rows}",
                        cells.len()
                    ),
                ));
            }
            if columns.contains_key(&name) {
                return Err(TableGuardError::data_source(
                    "table",
                    format!("duplicate column name '{name}'"),
                ));
            }
            names.push(name.clone());
            columns.insert(name, cells);
        }

        Ok(Table {
            names,
            columns,
            num_rows,
        })
    }
}
