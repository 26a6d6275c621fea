//! Validation result types.

use super::{RuleKind, Violation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The outcome of evaluating a rule set against a table.
///
/// Every field round-trips through JSON, so the JSON report is a lossless
/// copy of this structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Number of rows in the table
    pub total_rows: usize,
    /// Number of columns in the table
    pub total_columns: usize,
    /// Number of distinct rows with at least one violation
    pub rows_failed: usize,
    /// True iff `violations` is empty
    pub passed: bool,
    /// Every violation, in evaluation order
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// Builds a result from the table dimensions and collected violations.
    pub fn new(total_rows: usize, total_columns: usize, violations: Vec<Violation>) -> Self {
        let rows_failed = violations
            .iter()
            .filter_map(|v| v.row_index)
            .collect::<BTreeSet<_>>()
            .len();
        Self {
            total_rows,
            total_columns,
            rows_failed,
            passed: violations.is_empty(),
            violations,
        }
    }

    /// Returns true if no violation was found.
    pub fn is_success(&self) -> bool {
        self.passed
    }

    /// Returns true if at least one violation was found.
    pub fn is_failure(&self) -> bool {
        !self.passed
    }

    /// Violations found in the given column.
    pub fn violations_for_column<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.column == column)
    }

    /// Violations of the given kind.
    pub fn violations_of_kind(&self, kind: RuleKind) -> impl Iterator<Item = &Violation> + '_ {
        self.violations.iter().filter(move |v| v.rule_kind == kind)
    }

    /// Number of violations per kind, omitting kinds with none.
    pub fn counts_by_kind(&self) -> BTreeMap<RuleKind, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.rule_kind).or_insert(0) += 1;
        }
        counts
    }

    /// Formats the result as pretty-printed JSON.
    pub fn to_json(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{JsonFormatter, ResultFormatter};
        JsonFormatter::new().format(self)
    }

    /// Formats the result as a Markdown report.
    pub fn to_markdown(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{MarkdownFormatter, ResultFormatter};
        MarkdownFormatter::new().format(self)
    }

    /// Formats the result for console output.
    pub fn to_human(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{HumanFormatter, ResultFormatter};
        HumanFormatter::new().format(self)
    }
}
