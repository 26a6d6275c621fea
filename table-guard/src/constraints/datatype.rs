//! Type coercion and type checks.
//!
//! Each ruled column is coerced once into [`CellState`]s. The type check
//! reports the mismatches, and the range check reuses the coerced scalars so
//! an unparseable cell is reported exactly once.

use crate::core::{CellState, CellValue, ColumnContext, ColumnType, Constraint, RuleKind, Scalar, Violation};
use chrono::NaiveDate;

/// Date format accepted for `date` columns and date bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO-8601 calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Parses text as a whole number.
///
/// `"12"` and `"12.0"` are whole numbers, `"12.5"` is not.
pub fn parse_whole(text: &str) -> Option<Scalar> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Some(Scalar::Int(v));
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Some(Scalar::Float(v)),
        _ => None,
    }
}

/// Parses text as a real number. NaN is rejected.
pub fn parse_real(text: &str) -> Option<Scalar> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Some(Scalar::Int(v));
    }
    match text.parse::<f64>() {
        Ok(v) if !v.is_nan() => Some(Scalar::Float(v)),
        _ => None,
    }
}

/// Coerces a cell into the given type.
pub fn coerce(cell: &CellValue, column_type: ColumnType) -> CellState {
    let scalar = match (column_type, cell) {
        (_, CellValue::Null) => return CellState::Null,
        (ColumnType::String, _) => return CellState::Valid(None),

        (ColumnType::Int, CellValue::Integer(v)) => Some(Scalar::Int(*v)),
        (ColumnType::Int, CellValue::Real(v)) if v.is_finite() && v.fract() == 0.0 => {
            Some(Scalar::Float(*v))
        }
        (ColumnType::Int, CellValue::Text(s)) => parse_whole(s),

        (ColumnType::Float, CellValue::Integer(v)) => Some(Scalar::Int(*v)),
        (ColumnType::Float, CellValue::Real(v)) => Some(Scalar::Float(*v)),
        (ColumnType::Float, CellValue::Text(s)) => parse_real(s),

        (ColumnType::Date, CellValue::Date(d)) => Some(Scalar::Date(*d)),
        (ColumnType::Date, CellValue::Text(s)) => parse_date(s).map(Scalar::Date),

        _ => None,
    };

    match scalar {
        Some(scalar) => CellState::Valid(Some(scalar)),
        None => CellState::Mismatch,
    }
}

/// Coerces every cell of a column.
///
/// Without a type, every non-null cell is valid and has no ordering.
pub fn coerce_column(cells: &[CellValue], column_type: Option<ColumnType>) -> Vec<CellState> {
    match column_type {
        Some(column_type) => cells.iter().map(|cell| coerce(cell, column_type)).collect(),
        None => cells
            .iter()
            .map(|cell| {
                if cell.is_null() {
                    CellState::Null
                } else {
                    CellState::Valid(None)
                }
            })
            .collect(),
    }
}

/// Reports cells that do not parse as the column's type.
#[derive(Debug, Clone)]
pub struct DataTypeConstraint {
    expected: ColumnType,
    inferred: bool,
}

impl DataTypeConstraint {
    /// Creates a type check for a declared type.
    pub fn new(expected: ColumnType) -> Self {
        Self {
            expected,
            inferred: false,
        }
    }

    /// Creates a type check for a type inferred from range bounds.
    pub fn inferred(expected: ColumnType) -> Self {
        Self {
            expected,
            inferred: true,
        }
    }

    /// The type cells are checked against.
    pub fn expected(&self) -> ColumnType {
        self.expected
    }
}

impl Constraint for DataTypeConstraint {
    fn name(&self) -> &str {
        "type"
    }

    fn evaluate(&self, column: &ColumnContext<'_>, violations: &mut Vec<Violation>) {
        for (row, state) in column.states.iter().enumerate() {
            if !matches!(state, CellState::Mismatch) {
                continue;
            }
            let cell = &column.cells[row];
            let expected = if self.inferred {
                format!("{} (from range bounds)", self.expected)
            } else {
                self.expected.to_string()
            };
            violations.push(column.violation(
                row,
                RuleKind::Type,
                format!("expected {expected}, found {} '{cell}'", cell.kind()),
            ));
        }
    }

    fn description(&self) -> Option<String> {
        Some(format!("values of type {}", self.expected))
    }
}
