//! Property-based tests for the validation engine.
//!
//! Each property generates a column, computes the expected outcome directly
//! from the generated values, and compares it with what the engine reports.

use proptest::prelude::*;
use std::collections::HashMap;
use table_guard::constraints::DuplicateMarking;
use table_guard::core::{ColumnRule, ColumnType, RuleKind, Table, Validator};

fn nullable_ints() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::weighted(0.8, -50i64..50), 0..60)
}

fn single_column(values: &[Option<i64>]) -> Table {
    Table::builder()
        .column("value", values.to_vec())
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn validation_is_deterministic(values in nullable_ints(), lo in -60i64..0, hi in 0i64..60) {
        let table = single_column(&values);
        let rules = vec![
            ColumnRule::new("value")
                .with_type(ColumnType::Int)
                .with_min(lo)
                .with_max(hi)
                .not_null()
                .unique(),
        ];
        let validator = Validator::new();
        let first = validator.validate(&table, &rules).unwrap();
        let second = validator.validate(&table, &rules).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn not_null_counts_every_null(values in nullable_ints()) {
        let table = single_column(&values);
        let result = Validator::new()
            .validate(&table, &[ColumnRule::new("value").not_null()])
            .unwrap();

        let expected: Vec<_> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(row, _)| Some(row))
            .collect();
        let reported: Vec<_> = result.violations.iter().map(|v| v.row_index).collect();
        prop_assert_eq!(reported, expected);
        prop_assert!(result.violations.iter().all(|v| v.rule_kind == RuleKind::NotNull));
    }

    #[test]
    fn uniqueness_flags_all_but_first(values in nullable_ints()) {
        let table = single_column(&values);
        let result = Validator::new()
            .validate(&table, &[ColumnRule::new("value").unique()])
            .unwrap();

        let mut seen = HashMap::new();
        let mut expected = Vec::new();
        for (row, value) in values.iter().enumerate() {
            if let Some(v) = value {
                if seen.insert(*v, row).is_some() {
                    expected.push(Some(row));
                }
            }
        }
        let reported: Vec<_> = result.violations.iter().map(|v| v.row_index).collect();
        prop_assert_eq!(reported, expected);
    }

    #[test]
    fn uniqueness_all_marks_every_repeated_value(values in nullable_ints()) {
        let table = single_column(&values);
        let result = Validator::builder()
            .duplicate_marking(DuplicateMarking::All)
            .build()
            .validate(&table, &[ColumnRule::new("value").unique()])
            .unwrap();

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for v in values.iter().flatten() {
            *counts.entry(*v).or_default() += 1;
        }
        let expected: Vec<_> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_some_and(|v| counts[&v] > 1))
            .map(|(row, _)| Some(row))
            .collect();
        let reported: Vec<_> = result.violations.iter().map(|v| v.row_index).collect();
        prop_assert_eq!(reported, expected);
    }

    #[test]
    fn range_reports_each_out_of_bounds_value(values in nullable_ints(), lo in -60i64..0, hi in 0i64..60) {
        let table = single_column(&values);
        let result = Validator::new()
            .validate(&table, &[ColumnRule::new("value").with_min(lo).with_max(hi)])
            .unwrap();

        let below = values.iter().flatten().filter(|v| **v < lo).count();
        let above = values.iter().flatten().filter(|v| **v > hi).count();
        prop_assert_eq!(result.violations_of_kind(RuleKind::Min).count(), below);
        prop_assert_eq!(result.violations_of_kind(RuleKind::Max).count(), above);
        prop_assert_eq!(result.violations.len(), below + above);
    }

    #[test]
    fn missing_column_is_one_violation(values in nullable_ints(), name in "[a-z]{1,8}") {
        prop_assume!(name != "value");
        let table = single_column(&values);
        let rule = ColumnRule::new(name.clone()).with_min(0i64).not_null().unique();
        let result = Validator::new().validate(&table, &[rule]).unwrap();

        prop_assert_eq!(result.violations.len(), 1);
        prop_assert_eq!(result.violations[0].rule_kind, RuleKind::MissingColumn);
        prop_assert_eq!(&result.violations[0].column, &name);
    }

    #[test]
    fn passed_iff_no_violations(values in nullable_ints()) {
        let table = single_column(&values);
        let result = Validator::new()
            .validate(&table, &[ColumnRule::new("value").not_null().unique()])
            .unwrap();
        prop_assert_eq!(result.passed, result.violations.is_empty());
        prop_assert!(result.rows_failed <= result.total_rows);
    }
}
