//! Core validation types for table-guard.
//!
//! ## Overview
//!
//! - **[`Table`]**: a normalized table of tagged [`CellValue`]s, built by a loader
//! - **[`ColumnRule`]**: the constraints configured for one column
//! - **[`Validator`]**: the engine; compiles rules and evaluates them
//! - **[`ValidationResult`]**: every [`Violation`] found, plus summary counts
//!
//! ## Architecture
//!
//! ```text
//! Table + [ColumnRule]
//!     └── Validator::compile   -> CompiledRule (ordered Constraints)
//!         └── Validator::validate
//!             ├── missing column?  -> Violation(missing_column), skip rule
//!             ├── coerce cells     -> CellState per row
//!             └── Constraint::evaluate for each check -> Violations
//! ```
//!
//! ## Example
//!
//! ```rust
//! use table_guard::core::{ColumnRule, RuleKind, Table, Validator};
//!
//! let table = Table::builder()
//!     .column("user_id", vec![5i64, 3, 5, 5])
//!     .build()
//!     .unwrap();
//! let rules = vec![
//!     ColumnRule::new("user_id").unique(),
//!     ColumnRule::new("email").not_null(),
//! ];
//!
//! let result = Validator::new().validate(&table, &rules).unwrap();
//!
//! assert_eq!(result.violations_of_kind(RuleKind::Unique).count(), 2);
//! assert_eq!(result.violations_of_kind(RuleKind::MissingColumn).count(), 1);
//! ```

mod constraint;
mod engine;
mod result;
mod rule;
mod table;
mod violation;

pub use constraint::{BoxedConstraint, CellState, ColumnContext, Constraint, Scalar};
pub use engine::{CompiledRule, Validator, ValidatorBuilder, ValidatorConfig};
pub use result::ValidationResult;
pub use rule::{Bound, ColumnRule, ColumnType};
pub use table::{CellValue, Table, TableBuilder};
pub use violation::{RuleKind, Violation};
