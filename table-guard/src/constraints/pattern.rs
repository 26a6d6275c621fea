//! Full-match regex checks.

use crate::core::{ColumnContext, Constraint, RuleKind, Violation};
use regex::Regex;

/// Requires the entire text of every non-null cell to match a pattern.
///
/// The configured pattern is wrapped as `^(?:pattern)$`, so a pattern that
/// only matches a substring, or an alternation whose leftmost branch matches
/// a prefix, does not satisfy the check.
#[derive(Debug, Clone)]
pub struct PatternConstraint {
    pattern: String,
    regex: Regex,
}

impl PatternConstraint {
    /// Compiles a full-match constraint for `pattern`.
    pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self { pattern, regex })
    }

    /// The pattern as configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns true if the whole of `text` matches.
    pub fn is_full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl Constraint for PatternConstraint {
    fn name(&self) -> &str {
        "regex"
    }

    fn evaluate(&self, column: &ColumnContext<'_>, violations: &mut Vec<Violation>) {
        for (row, cell) in column.non_null() {
            let text = cell.to_string();
            if !self.is_full_match(&text) {
                violations.push(column.violation(
                    row,
                    RuleKind::Regex,
                    format!("value '{text}' does not match pattern '{}'", self.pattern),
                ));
            }
        }
    }

    fn description(&self) -> Option<String> {
        Some(format!("values matching '{}'", self.pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::datatype::coerce_column;
    use crate::core::CellValue;

    const EMAIL: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

    #[test]
    fn test_email_pattern() {
        let constraint = PatternConstraint::new(EMAIL).unwrap();
        assert!(constraint.is_full_match("a@b.com"));
        assert!(!constraint.is_full_match("not-an-email"));
        assert!(!constraint.is_full_match("bad@"));
    }

    #[test]
    fn test_substring_match_is_not_enough() {
        let constraint = PatternConstraint::new(r"\d{3}").unwrap();
        assert!(constraint.is_full_match("123"));
        assert!(!constraint.is_full_match("a123b"));

        let alternation = PatternConstraint::new("a|ab").unwrap();
        assert!(alternation.is_full_match("ab"));
        assert!(!alternation.is_full_match("abc"));
    }

    #[test]
    fn test_nulls_are_exempt() {
        let cells = vec![
            CellValue::text("a@b.com"),
            CellValue::Null,
            CellValue::text("not-an-email"),
        ];
        let states = coerce_column(&cells, None);
        let ctx = ColumnContext::new("email", &cells, &states);

        let mut violations = Vec::new();
        PatternConstraint::new(EMAIL)
            .unwrap()
            .evaluate(&ctx, &mut violations);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row_index, Some(2));
        assert_eq!(violations[0].rule_kind, RuleKind::Regex);
        assert_eq!(violations[0].value.as_deref(), Some("not-an-email"));
    }

    #[test]
    fn test_numbers_match_on_their_text() {
        let cells = vec![CellValue::Integer(12345), CellValue::Integer(12)];
        let states = coerce_column(&cells, None);
        let ctx = ColumnContext::new("zip", &cells, &states);

        let mut violations = Vec::new();
        PatternConstraint::new(r"\d{5}")
            .unwrap()
            .evaluate(&ctx, &mut violations);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row_index, Some(1));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternConstraint::new("([a-z]").is_err());
    }
}
