//! # table-guard - Rule-based validation for tabular data
//!
//! table-guard checks a tabular dataset against a declarative list of column
//! rules and reports every violation it finds. The outcome is a
//! [`ValidationResult`](core::ValidationResult) that renders to a lossless JSON
//! report and a human-readable Markdown report.
//!
//! ## Quick Start
//!
//! ```rust
//! use table_guard::prelude::*;
//! use table_guard::core::RuleKind;
//!
//! let table = Table::builder()
//!     .column("customer_id", vec![1i64, 2, 2])
//!     .column("age", vec![Some(34i64), Some(200), None])
//!     .build()?;
//!
//! let rules = RuleSet::from_yaml_str(
//!     r#"
//! rules:
//!   - column: customer_id
//!     unique: true
//!   - column: age
//!     type: int
//!     min: 0
//!     max: 120
//!     not_null: true
//! "#,
//! )?;
//!
//! let result = Validator::new().validate(&table, rules.rules())?;
//!
//! assert!(!result.passed);
//! assert_eq!(result.violations_of_kind(RuleKind::Unique).count(), 1);
//! assert_eq!(result.violations_of_kind(RuleKind::Max).count(), 1);
//! assert_eq!(result.violations_of_kind(RuleKind::NotNull).count(), 1);
//! # Ok::<(), table_guard::error::TableGuardError>(())
//! ```
//!
//! ## Rules
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `column` | Column the rule applies to (required) |
//! | `type` | `int`, `float`, `string` or `date` (`YYYY-MM-DD`) |
//! | `min` / `max` | Inclusive bounds, numeric or date |
//! | `regex` | Full-match pattern for the value's text |
//! | `not_null` | Nulls are violations |
//! | `unique` | Repeated values are violations |
//!
//! A rule whose column is absent from the table produces one
//! `missing_column` violation and nothing else. Data problems never abort a
//! run; only unusable configuration or unreadable input returns an error.
//!
//! ## Architecture
//!
//! - **`sources`**: loads CSV, TSV, JSON, NDJSON, Parquet and Excel into a [`core::Table`]
//! - **`config`**: YAML rule sets
//! - **`core`**: tables, rules, the [`core::Validator`] engine and results
//! - **`constraints`**: one [`core::Constraint`] per kind of check
//! - **`formatters`**: JSON, Markdown and console rendering, plus report files
//! - **`logging`**: `tracing` configuration

pub mod config;
pub mod constraints;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod sources;
