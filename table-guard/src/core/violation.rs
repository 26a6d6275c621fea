//! Violations: single breaches of a single rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of rule a violation breaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// The cell does not parse as the declared type
    Type,
    /// The cell is below the lower bound
    Min,
    /// The cell is above the upper bound
    Max,
    /// The cell does not fully match the pattern
    Regex,
    /// The cell is null but nulls are forbidden
    NotNull,
    /// The cell repeats an earlier value
    Unique,
    /// The rule references a column the table does not have
    MissingColumn,
}

impl RuleKind {
    /// All kinds, in reporting order.
    pub const ALL: [RuleKind; 7] = [
        RuleKind::MissingColumn,
        RuleKind::NotNull,
        RuleKind::Type,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Regex,
        RuleKind::Unique,
    ];

    /// Returns the serialized name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Type => "type",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Regex => "regex",
            RuleKind::NotNull => "not_null",
            RuleKind::Unique => "unique",
            RuleKind::MissingColumn => "missing_column",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected breach of a single constraint for a single cell or column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Column the violation was found in
    pub column: String,
    /// Zero-based row, absent for column-level issues
    pub row_index: Option<usize>,
    /// Which rule was breached
    pub rule_kind: RuleKind,
    /// Human-readable description
    pub message: String,
    /// The original cell value as text
    pub value: Option<String>,
}

impl Violation {
    /// Creates a violation for a single cell.
    pub fn cell(
        column: impl Into<String>,
        row_index: usize,
        rule_kind: RuleKind,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            column: column.into(),
            row_index: Some(row_index),
            rule_kind,
            message: message.into(),
            value,
        }
    }

    /// Creates the schema drift violation for a column absent from the table.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            row_index: None,
            rule_kind: RuleKind::MissingColumn,
            message: "column not found".to_string(),
            value: None,
        }
    }
}
