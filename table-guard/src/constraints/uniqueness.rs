//! Duplicate detection for `unique` columns.

use crate::core::{ColumnContext, Constraint, RuleKind, Violation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which occurrences of a repeated value are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateMarking {
    /// The first occurrence wins; every later occurrence is a violation
    #[default]
    AllButFirst,
    /// Every occurrence of a repeated value is a violation
    All,
}

/// Flags repeated non-null values in a column.
///
/// Values are compared on their original text, so `5` and `"5"` collide
/// while `"05"` and `"5"` do not. Nulls never collide with each other.
#[derive(Debug, Clone, Default)]
pub struct UniquenessConstraint {
    marking: DuplicateMarking,
}

impl UniquenessConstraint {
    /// Creates a uniqueness constraint with the given tie-break.
    pub fn new(marking: DuplicateMarking) -> Self {
        Self { marking }
    }
}

impl Constraint for UniquenessConstraint {
    fn name(&self) -> &str {
        "unique"
    }

    fn evaluate(&self, column: &ColumnContext<'_>, violations: &mut Vec<Violation>) {
        let mut occurrences: HashMap<String, Vec<usize>> = HashMap::new();
        for (row, cell) in column.non_null() {
            occurrences.entry(cell.to_string()).or_default().push(row);
        }

        // Emit in row order, independent of hash iteration order.
        let mut flagged: Vec<(usize, usize)> = Vec::new();
        for rows in occurrences.values().filter(|rows| rows.len() > 1) {
            let first = rows[0];
            let skip = match self.marking {
                DuplicateMarking::AllButFirst => 1,
                DuplicateMarking::All => 0,
            };
            flagged.extend(rows.iter().skip(skip).map(|&row| (row, first)));
        }
        flagged.sort_unstable();

        for (row, first) in flagged {
            let message = if row == first {
                format!("duplicate value '{}' (repeated later in the column)", column.cells[row])
            } else {
                format!(
                    "duplicate value '{}' (first seen at row {first})",
                    column.cells[row]
                )
            };
            violations.push(column.violation(row, RuleKind::Unique, message));
        }
    }

    fn description(&self) -> Option<String> {
        Some("unique values".to_string())
    }
}
