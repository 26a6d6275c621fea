//! The validation engine.
//!
//! [`Validator::validate`] is a pure function of a [`Table`] and a rule list.
//! Rules are compiled first, so an uninterpretable rule aborts the run before
//! any cell is looked at. Evaluation then walks the rules in configuration
//! order and, within a rule, runs the checks in a fixed order:
//! missing column, not null, type, range, regex, unique.

use super::{BoxedConstraint, ColumnContext, ColumnRule, Table, ValidationResult, Violation};
use crate::constraints::datatype::coerce_column;
use crate::constraints::range::{infer_type, BoundError};
use crate::constraints::{
    CompletenessConstraint, DataTypeConstraint, DuplicateMarking, PatternConstraint,
    RangeConstraint, UniquenessConstraint,
};
use crate::core::ColumnType;
use crate::log_rule;
use crate::logging::{truncate_field, LogConfig};
use crate::prelude::*;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// Which occurrences of a repeated value the uniqueness check reports
    pub duplicate_marking: DuplicateMarking,
    /// Logging behaviour
    pub log: LogConfig,
}

/// A rule compiled into its executable checks.
#[derive(Debug)]
pub struct CompiledRule {
    index: usize,
    column: String,
    column_type: Option<ColumnType>,
    constraints: Vec<BoxedConstraint>,
}

impl CompiledRule {
    /// Position of the rule in the rule set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The column the rule targets.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Names of the compiled checks, in evaluation order.
    pub fn constraint_names(&self) -> Vec<&str> {
        self.constraints.iter().map(|c| c.name()).collect()
    }
}

/// Evaluates column rules against tables.
///
/// A `Validator` holds only immutable configuration; one instance can be
/// shared across threads and reused for any number of runs.
///
/// # Examples
///
/// ```rust
/// use table_guard::core::{ColumnRule, ColumnType, RuleKind, Table, Validator};
///
/// let table = Table::builder()
///     .column("age", vec!["10", "", "200"])
///     .build()
///     .unwrap();
/// let rules = vec![ColumnRule::new("age")
///     .with_type(ColumnType::Int)
///     .with_min(0i64)
///     .with_max(120i64)
///     .not_null()];
///
/// let result = Validator::new().validate(&table, &rules).unwrap();
///
/// assert!(!result.passed);
/// let kinds: Vec<_> = result.violations.iter().map(|v| v.rule_kind).collect();
/// assert_eq!(kinds, vec![RuleKind::NotNull, RuleKind::Max]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Creates a validator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new validator builder.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// The engine configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Compiles rules into executable checks.
    ///
    /// Fails on the first rule that cannot be interpreted: an empty column
    /// name, an invalid regex, or range bounds that do not fit the declared
    /// type. The error carries the rule's index and column.
    pub fn compile(&self, rules: &[ColumnRule]) -> Result<Vec<CompiledRule>> {
        rules
            .iter()
            .enumerate()
            .map(|(index, rule)| self.compile_rule(index, rule))
            .collect()
    }

    fn compile_rule(&self, index: usize, rule: &ColumnRule) -> Result<CompiledRule> {
        if rule.column.trim().is_empty() {
            return Err(TableGuardError::invalid_rule(
                index,
                &rule.column,
                "column name must not be empty",
            ));
        }
        let invalid = |BoundError(message): BoundError| {
            TableGuardError::invalid_rule(index, &rule.column, message)
        };

        // Untyped rules with bounds compare in a domain inferred from the bounds.
        let (column_type, inferred) = match rule.column_type {
            Some(column_type) => (Some(column_type), false),
            None if rule.has_range() => {
                let bounds: Vec<_> = rule.min.iter().chain(rule.max.iter()).collect();
                (Some(infer_type(&bounds).map_err(invalid)?), true)
            }
            None => (None, false),
        };

        let mut constraints: Vec<BoxedConstraint> = Vec::new();
        if rule.requires_not_null() {
            constraints.push(Box::new(CompletenessConstraint::new()));
        }
        if let Some(column_type) = column_type {
            constraints.push(Box::new(if inferred {
                DataTypeConstraint::inferred(column_type)
            } else {
                DataTypeConstraint::new(column_type)
            }));
            if rule.has_range() {
                let range =
                    RangeConstraint::from_bounds(rule.min.as_ref(), rule.max.as_ref(), column_type)
                        .map_err(invalid)?;
                constraints.push(Box::new(range));
            }
        }
        if let Some(pattern) = &rule.regex {
            let constraint = PatternConstraint::new(pattern.as_str()).map_err(|e| {
                TableGuardError::invalid_rule(index, &rule.column, format!("invalid regex: {e}"))
            })?;
            constraints.push(Box::new(constraint));
        }
        if rule.requires_unique() {
            constraints.push(Box::new(UniquenessConstraint::new(
                self.config.duplicate_marking,
            )));
        }

        Ok(CompiledRule {
            index,
            column: rule.column.clone(),
            column_type,
            constraints,
        })
    }

    /// Validates a table against a list of rules.
    ///
    /// Data problems never fail this call; they are collected as violations.
    /// Only rules that cannot be compiled return an error.
    #[instrument(skip_all, fields(
        table.rows = table.num_rows(),
        table.columns = table.num_columns(),
        rules = rules.len()
    ))]
    pub fn validate(&self, table: &Table, rules: &[ColumnRule]) -> Result<ValidationResult> {
        let start = Instant::now();
        let compiled = self.compile(rules)?;

        let mut violations = Vec::new();
        for rule in &compiled {
            let before = violations.len();
            self.evaluate_rule(table, rule, &mut violations);
            log_rule!(
                self.config.log,
                rule.index = rule.index,
                rule.column = %rule.column,
                rule.checks = ?rule.constraint_names(),
                rule.violations = violations.len() - before,
                "Evaluated rule"
            );
        }

        let result = ValidationResult::new(table.num_rows(), table.num_columns(), violations);
        info!(
            validation.passed = result.passed,
            validation.violations = result.violations.len(),
            validation.rows_failed = result.rows_failed,
            validation.duration_ms = start.elapsed().as_millis() as u64,
            "Validation completed"
        );
        Ok(result)
    }

    fn evaluate_rule(&self, table: &Table, rule: &CompiledRule, violations: &mut Vec<Violation>) {
        let Some(cells) = table.column(&rule.column) else {
            debug!(rule.index = rule.index, rule.column = %rule.column, "Column not found in table");
            violations.push(Violation::missing_column(&rule.column));
            return;
        };

        let states = coerce_column(cells, rule.column_type);
        let column = ColumnContext::new(&rule.column, cells, &states);
        for constraint in &rule.constraints {
            let before = violations.len();
            constraint.evaluate(&column, violations);
            if let Some(first) = violations.get(before) {
                log_rule!(
                    self.config.log,
                    rule.column = %rule.column,
                    constraint = constraint.name(),
                    violations = violations.len() - before,
                    first.value = %truncate_field(
                        first.value.as_deref().unwrap_or(""),
                        self.config.log.max_field_length
                    ),
                    "Constraint reported violations"
                );
            }
        }
    }
}

/// Builder for [`Validator`].
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    config: ValidatorConfig,
}

impl ValidatorBuilder {
    /// Sets which occurrences of a repeated value are reported.
    pub fn duplicate_marking(mut self, marking: DuplicateMarking) -> Self {
        self.config.duplicate_marking = marking;
        self
    }

    /// Sets the logging configuration.
    pub fn log_config(mut self, log: LogConfig) -> Self {
        self.config.log = log;
        self
    }

    /// Builds the validator.
    pub fn build(self) -> Validator {
        Validator {
            config: self.config,
        }
    }
}
