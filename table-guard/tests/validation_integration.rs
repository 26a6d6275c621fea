//! End-to-end validation tests: rule files, loaded datasets, and reports.

use std::fs::File;
use rust_xlsxwriter::Workbook;
use std::io::Write;
use table_guard::constraints::DuplicateMarking;
use table_guard::core::{CellValue, RuleKind, Violation};
use table_guard::formatters::write_reports;
use table_guard::prelude::*;
use table_guard::sources::load_table;
use tempfile::TempDir;

const CUSTOMER_RULES: &str = r#"
rules:
  - column: user_id
    unique: true
  - column: age
    type: int
    min: 0
    max: 120
  - column: email
    regex: '^[^@\s]+@[^@\s]+\.[^@\s]+$'
  - column: signup_date
    type: date
    min: '2020-01-01'
"#;

fn customer_table() -> Table {
    Table::builder()
        .column("user_id", vec![1i64, 2, 2])
        .column("age", vec![Some(10i64), None, Some(200)])
        .column("email", vec!["a@b.com", "bad@", "c@d.com"])
        .column("signup_date", vec!["2022-01-01", "2019-01-01", "2023-05-05"])
        .build()
        .unwrap()
}

fn validate(table: &Table, yaml: &str) -> ValidationResult {
    let rules = RuleSet::from_yaml_str(yaml).unwrap();
    Validator::new().validate(table, rules.rules()).unwrap()
}

fn kinds(result: &ValidationResult) -> Vec<(String, Option<usize>, RuleKind)> {
    result
        .violations
        .iter()
        .map(|v| (v.column.clone(), v.row_index, v.rule_kind))
        .collect()
}

#[test]
fn test_customer_dataset() {
    let result = validate(&customer_table(), CUSTOMER_RULES);

    assert!(!result.passed);
    assert_eq!(result.total_rows, 3);
    assert_eq!(result.total_columns, 4);
    assert_eq!(
        kinds(&result),
        vec![
            ("user_id".to_string(), Some(2), RuleKind::Unique),
            ("age".to_string(), Some(2), RuleKind::Max),
            ("email".to_string(), Some(1), RuleKind::Regex),
            ("signup_date".to_string(), Some(1), RuleKind::Min),
        ]
    );
    assert_eq!(result.rows_failed, 2);
}

#[test]
fn test_validation_is_deterministic() {
    let table = customer_table();
    let first = validate(&table, CUSTOMER_RULES);
    let second = validate(&table, CUSTOMER_RULES);
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.to_markdown().unwrap(), second.to_markdown().unwrap());
}

#[test]
fn test_missing_column_yields_single_violation() {
    let table = customer_table();
    let result = validate(
        &table,
        "rules:\n  - column: phone\n    type: int\n    min: 0\n    regex: '\\d+'\n    not_null: true\n    unique: true\n",
    );
    assert_eq!(result.violations, vec![Violation::missing_column("phone")]);
    assert_eq!(result.rows_failed, 0);
    assert!(!result.passed);
}

#[test]
fn test_not_null_single_null() {
    let table = Table::builder()
        .column("email", vec![Some("a@b.com"), None, Some("c@d.com")])
        .build()
        .unwrap();
    let result = validate(&table, "rules:\n  - column: email\n    not_null: true\n");

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].rule_kind, RuleKind::NotNull);
    assert_eq!(result.violations[0].row_index, Some(1));
}

#[test]
fn test_int_type_accepts_whole_text_only() {
    let table = Table::builder()
        .column("qty", vec!["12.5", "12"])
        .build()
        .unwrap();
    let result = validate(&table, "rules:\n  - column: qty\n    type: int\n");

    assert_eq!(result.violations.len(), 1);
    let violation = &result.violations[0];
    assert_eq!(violation.rule_kind, RuleKind::Type);
    assert_eq!(violation.row_index, Some(0));
    assert_eq!(violation.value.as_deref(), Some("12.5"));
}

#[test]
fn test_unique_flags_repeats_after_first() {
    let table = Table::builder()
        .column("id", vec![5i64, 3, 5, 5])
        .build()
        .unwrap();
    let yaml = "rules:\n  - column: id\n    unique: true\n";

    let result = validate(&table, yaml);
    let rows: Vec<_> = result.violations.iter().map(|v| v.row_index).collect();
    assert_eq!(rows, vec![Some(2), Some(3)]);

    let rules = RuleSet::from_yaml_str(yaml).unwrap();
    let all = Validator::builder()
        .duplicate_marking(DuplicateMarking::All)
        .build()
        .validate(&table, rules.rules())
        .unwrap();
    let rows: Vec<_> = all.violations.iter().map(|v| v.row_index).collect();
    assert_eq!(rows, vec![Some(0), Some(2), Some(3)]);
}

#[test]
fn test_email_pattern() {
    let table = Table::builder()
        .column("email", vec!["not-an-email", "a@b.com"])
        .build()
        .unwrap();
    let result = validate(
        &table,
        "rules:\n  - column: email\n    regex: '^[^@\\s]+@[^@\\s]+\\.[^@\\s]+$'\n",
    );

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].row_index, Some(0));
    assert_eq!(result.violations[0].rule_kind, RuleKind::Regex);
}

#[test]
fn test_zero_rules_pass() {
    let result = validate(&customer_table(), "rules: []\n");
    assert!(result.passed);
    assert!(result.violations.is_empty());
    assert_eq!(result.total_rows, 3);
}

#[test]
fn test_date_above_max() {
    let table = Table::builder()
        .column("d", vec!["2026-01-01", "2024-06-30"])
        .build()
        .unwrap();
    let result = validate(
        &table,
        "rules:\n  - column: d\n    type: date\n    min: 2020-01-01\n    max: 2025-12-31\n",
    );

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].rule_kind, RuleKind::Max);
    assert_eq!(result.violations[0].row_index, Some(0));
}

#[test]
fn test_nulls_only_reported_by_not_null() {
    let table = Table::builder()
        .column("score", vec![None::<f64>, Some(f64::NAN), Some(5.0)])
        .build()
        .unwrap();
    let result = validate(
        &table,
        "rules:\n  - column: score\n    type: float\n    min: 0\n    max: 10\n    regex: '\\d+'\n    unique: true\n",
    );
    assert!(result.passed);
    assert_eq!(table.column("score").unwrap()[1], CellValue::Null);
}

#[test]
fn test_uncompilable_rule_is_fatal() {
    let rules = RuleSet::from_yaml_str(
        "rules:\n  - column: age\n    type: int\n  - column: age\n    type: int\n    min: abc\n",
    )
    .unwrap();
    let err = Validator::new()
        .validate(&customer_table(), rules.rules())
        .unwrap_err();

    match err {
        TableGuardError::InvalidRule { index, column, .. } => {
            assert_eq!(index, 1);
            assert_eq!(column, "age");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_csv_to_reports() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("customers.csv");
    let mut file = File::create(&data).unwrap();
    writeln!(file, "user_id,age,email,signup_date").unwrap();
    writeln!(file, "1,10,a@b.com,2022-01-01").unwrap();
    writeln!(file, "2,,bad@,2019-01-01").unwrap();
    writeln!(file, "2,200,c@d.com,2023-05-05").unwrap();
    file.flush().unwrap();

    let rules_path = dir.path().join("rules.yaml");
    std::fs::write(&rules_path, CUSTOMER_RULES).unwrap();

    let table = load_table(&data).await.unwrap();
    let rules = RuleSet::from_path(&rules_path).unwrap();
    let result = Validator::new().validate(&table, rules.rules()).unwrap();

    assert_eq!(kinds(&result), kinds(&validate(&customer_table(), CUSTOMER_RULES)));

    let paths = write_reports(&result, dir.path().join("report")).unwrap();
    let json: ValidationResult =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(json, result);

    let markdown = std::fs::read_to_string(&paths.markdown).unwrap();
    assert!(markdown.starts_with("# Data Validation Report"));
    assert!(markdown.contains("**Status:** FAILED"));
    assert!(markdown.contains("| `email` | 1 | regex |"));
}

#[tokio::test]
async fn test_json_dataset_with_mixed_types() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("orders.json");
    std::fs::write(
        &data,
        r#"[{"order_id": 1, "amount": 9.99}, {"order_id": 2, "amount": "n/a"}, {"order_id": 2}]"#,
    )
    .unwrap();

    let table = load_table(&data).await.unwrap();
    let result = validate(
        &table,
        "rules:\n  - column: order_id\n    unique: true\n  - column: amount\n    type: float\n    min: 0\n    not_null: true\n",
    );

    assert_eq!(
        kinds(&result),
        vec![
            ("order_id".to_string(), Some(2), RuleKind::Unique),
            ("amount".to_string(), Some(2), RuleKind::NotNull),
            ("amount".to_string(), Some(1), RuleKind::Type),
        ]
    );
}

#[tokio::test]
async fn test_excel_workbook_to_reports() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("customers.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in ["user_id", "age", "email", "signup_date"].iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    sheet.write_number(1, 0, 1).unwrap();
    sheet.write_number(1, 1, 10).unwrap();
    sheet.write_string(1, 2, "a@b.com").unwrap();
    sheet.write_string(1, 3, "2022-01-01").unwrap();
    sheet.write_number(2, 0, 2).unwrap();
    sheet.write_string(2, 2, "bad@").unwrap();
    sheet.write_string(2, 3, "2019-01-01").unwrap();
    sheet.write_number(3, 0, 2).unwrap();
    sheet.write_number(3, 1, 200).unwrap();
    sheet.write_string(3, 2, "c@d.com").unwrap();
    sheet.write_string(3, 3, "2023-05-05").unwrap();
    workbook.save(&data).unwrap();

    let table = load_table(&data).await.unwrap();
    assert_eq!(table.num_rows(), 3);
    let result = validate(&table, CUSTOMER_RULES);
    assert_eq!(kinds(&result), kinds(&validate(&customer_table(), CUSTOMER_RULES)));

    let paths = write_reports(&result, dir.path().join("report")).unwrap();
    let markdown = std::fs::read_to_string(&paths.markdown).unwrap();
    assert!(markdown.contains("| `email` | 1 | regex |"));
}
