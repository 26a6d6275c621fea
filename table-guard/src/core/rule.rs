//! Declarative per-column rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical type a column is declared to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Whole numbers
    Int,
    /// Real numbers
    Float,
    /// Any text
    String,
    /// ISO-8601 calendar dates (`YYYY-MM-DD`)
    Date,
}

impl ColumnType {
    /// Returns the configuration name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A range bound as written in the configuration.
///
/// Bounds stay uninterpreted until the engine compiles the rule against its
/// declared type, so `min: "2020-01-01"` and `min: 0` both deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    /// Integer literal
    Integer(i64),
    /// Float literal
    Float(f64),
    /// String literal (dates, or numbers written as strings)
    Text(String),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Integer(v) => write!(f, "{v}"),
            Bound::Float(v) => write!(f, "{v}"),
            Bound::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::Integer(value)
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::Float(value)
    }
}

impl From<&str> for Bound {
    fn from(value: &str) -> Self {
        Bound::Text(value.to_string())
    }
}

/// A named set of constraints applied to one table column.
///
/// # Examples
///
/// ```rust
/// use table_guard::core::{ColumnRule, ColumnType};
///
/// let rule = ColumnRule::new("age")
///     .with_type(ColumnType::Int)
///     .with_min(0i64)
///     .with_max(120i64)
///     .not_null();
///
/// assert_eq!(rule.column, "age");
/// assert!(rule.has_range());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnRule {
    /// The column this rule applies to
    pub column: String,
    /// Declared type of the column
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,
    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,
    /// Inclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,
    /// Pattern the whole cell must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Whether null cells are violations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,
    /// Whether duplicate values are violations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
}

impl ColumnRule {
    /// Creates a rule with no constraints for the given column.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ..Self::default()
        }
    }

    /// Sets the declared type.
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    /// Sets the lower bound.
    pub fn with_min(mut self, min: impl Into<Bound>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Sets the upper bound.
    pub fn with_max(mut self, max: impl Into<Bound>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Sets the full-match pattern.
    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Forbids null cells.
    pub fn not_null(mut self) -> Self {
        self.not_null = Some(true);
        self
    }

    /// Forbids duplicate values.
    pub fn unique(mut self) -> Self {
        self.unique = Some(true);
        self
    }

    /// Returns true if null cells are violations.
    pub fn requires_not_null(&self) -> bool {
        self.not_null.unwrap_or(false)
    }

    /// Returns true if duplicates are violations.
    pub fn requires_unique(&self) -> bool {
        self.unique.unwrap_or(false)
    }

    /// Returns true if either bound is set.
    pub fn has_range(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}
