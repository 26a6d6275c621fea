//! Null checks for `not_null` columns.

use crate::core::{ColumnContext, Constraint, RuleKind, Violation};

/// Flags every null cell in a column.
#[derive(Debug, Clone, Default)]
pub struct CompletenessConstraint;

impl CompletenessConstraint {
    /// Creates a completeness constraint.
    pub fn new() -> Self {
        Self
    }
}

impl Constraint for CompletenessConstraint {
    fn name(&self) -> &str {
        "not_null"
    }

    fn evaluate(&self, column: &ColumnContext<'_>, violations: &mut Vec<Violation>) {
        for (row, cell) in column.cells.iter().enumerate() {
            if cell.is_null() {
                violations.push(Violation::cell(
                    column.name,
                    row,
                    RuleKind::NotNull,
                    "null value not allowed",
                    None,
                ));
            }
        }
    }

    fn description(&self) -> Option<String> {
        Some("no null values".to_string())
    }
}
