//! Constraint trait and the column view constraints are evaluated against.

use super::{CellValue, RuleKind, Violation};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt::{self, Debug};

/// A cell value resolved into a comparison domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Exact integer
    Int(i64),
    /// Real number
    Float(f64),
    /// Calendar date
    Date(NaiveDate),
}

impl Scalar {
    /// Orders two scalars of compatible domains.
    ///
    /// Integers compare exactly with each other and through `f64` against
    /// floats. Dates only compare with dates; any other pairing is `None`.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Int(a), Scalar::Float(b)) => (*a as f64).partial_cmp(b),
            (Scalar::Float(a), Scalar::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
            (Scalar::Date(a), Scalar::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

/// A cell after type coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellState {
    /// The cell is null
    Null,
    /// The cell satisfies the column's type; `None` when the type has no ordering
    Valid(Option<Scalar>),
    /// The cell does not parse as the column's type
    Mismatch,
}

/// A ruled column as seen by its constraints.
///
/// `states` runs parallel to `cells`: entry `i` is the coerced form of cell `i`.
#[derive(Debug, Clone, Copy)]
pub struct ColumnContext<'a> {
    /// Column name
    pub name: &'a str,
    /// The original cells
    pub cells: &'a [CellValue],
    /// Coerced cells
    pub states: &'a [CellState],
}

impl<'a> ColumnContext<'a> {
    /// Creates a column context.
    pub fn new(name: &'a str, cells: &'a [CellValue], states: &'a [CellState]) -> Self {
        debug_assert_eq!(cells.len(), states.len());
        Self {
            name,
            cells,
            states,
        }
    }

    /// Iterates over `(row, cell)` pairs of the non-null cells.
    pub fn non_null(&self) -> impl Iterator<Item = (usize, &'a CellValue)> + 'a {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_null())
    }

    /// Creates a violation for the given row, attaching the original value.
    pub fn violation(&self, row: usize, kind: RuleKind, message: impl Into<String>) -> Violation {
        Violation::cell(
            self.name,
            row,
            kind,
            message,
            self.cells.get(row).and_then(CellValue::as_text),
        )
    }
}

/// A single check applied to one column.
///
/// Implementations hold only their compiled configuration and append
/// violations in row order, so evaluating the same column twice yields the
/// same output.
pub trait Constraint: Debug + Send + Sync {
    /// Returns the name of the constraint.
    fn name(&self) -> &str;

    /// Evaluates the constraint against a column, appending any violations.
    fn evaluate(&self, column: &ColumnContext<'_>, violations: &mut Vec<Violation>);

    /// Returns a description of what this constraint validates.
    fn description(&self) -> Option<String> {
        None
    }
}

/// A boxed constraint for use in collections.
pub type BoxedConstraint = Box<dyn Constraint>;
