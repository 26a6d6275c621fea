//! Built-in per-column constraints.
//!
//! Each constraint implements [`Constraint`](crate::core::Constraint) and is
//! evaluated against a [`ColumnContext`](crate::core::ColumnContext): the
//! column's original cells plus their coerced [`CellState`](crate::core::CellState)s.
//! The engine compiles every [`ColumnRule`](crate::core::ColumnRule) into an
//! ordered list of these:
//!
//! 1. [`CompletenessConstraint`] - `not_null`
//! 2. [`DataTypeConstraint`] - `type` (declared, or inferred from range bounds)
//! 3. [`RangeConstraint`] - `min` / `max`
//! 4. [`PatternConstraint`] - `regex`, anchored to the whole cell
//! 5. [`UniquenessConstraint`] - `unique`, column-scoped
//!
//! Null cells are exempt from everything except the completeness check.
//!
//! ```rust
//! use table_guard::constraints::{DuplicateMarking, UniquenessConstraint};
//! use table_guard::constraints::datatype::coerce_column;
//! use table_guard::core::{CellValue, ColumnContext, Constraint};
//!
//! let cells: Vec<CellValue> = vec![5i64, 3, 5, 5].into_iter().map(Into::into).collect();
//! let states = coerce_column(&cells, None);
//! let column = ColumnContext::new("user_id", &cells, &states);
//!
//! let mut violations = Vec::new();
//! UniquenessConstraint::new(DuplicateMarking::AllButFirst).evaluate(&column, &mut violations);
//!
//! let rows: Vec<_> = violations.iter().filter_map(|v| v.row_index).collect();
//! assert_eq!(rows, vec![2, 3]);
//! ```

mod completeness;
pub mod datatype;
mod pattern;
pub mod range;
mod uniqueness;

pub use completeness::CompletenessConstraint;
pub use datatype::DataTypeConstraint;
pub use pattern::PatternConstraint;
pub use range::RangeConstraint;
pub use uniqueness::{DuplicateMarking, UniquenessConstraint};
