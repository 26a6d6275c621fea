//! Inclusive min/max checks for numeric and date columns.

use super::datatype::{parse_date, parse_real};
use crate::core::{Bound, CellState, ColumnContext, ColumnType, Constraint, RuleKind, Scalar, Violation};
use std::cmp::Ordering;

/// Why a bound could not be resolved for a column type.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundError(pub String);

/// Resolves a configured bound into the comparison domain of `column_type`.
pub fn resolve_bound(bound: &Bound, column_type: ColumnType) -> Result<Scalar, BoundError> {
    match (column_type, bound) {
        (ColumnType::Int | ColumnType::Float, Bound::Integer(v)) => Ok(Scalar::Int(*v)),
        (ColumnType::Int | ColumnType::Float, Bound::Float(v)) if !v.is_nan() => {
            Ok(Scalar::Float(*v))
        }
        (ColumnType::Int | ColumnType::Float, Bound::Text(s)) => parse_real(s)
            .ok_or_else(|| BoundError(format!("bound '{s}' is not a number"))),
        (ColumnType::Date, Bound::Text(s)) => parse_date(s)
            .map(Scalar::Date)
            .ok_or_else(|| BoundError(format!("bound '{s}' is not a YYYY-MM-DD date"))),
        (ColumnType::Date, other) => Err(BoundError(format!(
            "bound '{other}' is not a YYYY-MM-DD date"
        ))),
        (ColumnType::String, _) => Err(BoundError(
            "range bounds are not supported for string columns".to_string(),
        )),
        (_, other) => Err(BoundError(format!("bound '{other}' is not a number"))),
    }
}

/// Infers the comparison type of an untyped rule from its bounds.
///
/// Numeric bounds compare as `float`, date bounds as `date`. Bounds that agree
/// on neither are rejected.
pub fn infer_type(bounds: &[&Bound]) -> Result<ColumnType, BoundError> {
    let all = |column_type| bounds.iter().all(|b| resolve_bound(b, column_type).is_ok());
    if all(ColumnType::Float) {
        Ok(ColumnType::Float)
    } else if all(ColumnType::Date) {
        Ok(ColumnType::Date)
    } else {
        Err(BoundError(
            "cannot infer a comparison type from the bounds; declare 'type'".to_string(),
        ))
    }
}

/// Flags type-valid cells outside `[min, max]`.
///
/// Cells that failed coercion are skipped; the type check already reported
/// them.
#[derive(Debug, Clone)]
pub struct RangeConstraint {
    min: Option<Scalar>,
    max: Option<Scalar>,
}

impl RangeConstraint {
    /// Creates a range constraint. Either bound may be absent.
    pub fn new(min: Option<Scalar>, max: Option<Scalar>) -> Result<Self, BoundError> {
        if let (Some(lo), Some(hi)) = (&min, &max) {
            match lo.compare(hi) {
                Some(Ordering::Greater) => {
                    return Err(BoundError(format!("min {lo} is greater than max {hi}")))
                }
                None => return Err(BoundError(format!("min {lo} and max {hi} are not comparable"))),
                _ => {}
            }
        }
        Ok(Self { min, max })
    }

    /// Compiles configured bounds against a column type.
    pub fn from_bounds(
        min: Option<&Bound>,
        max: Option<&Bound>,
        column_type: ColumnType,
    ) -> Result<Self, BoundError> {
        if column_type == ColumnType::String {
            return Err(BoundError(
                "range bounds are not supported for string columns".to_string(),
            ));
        }
        let resolve = |bound: Option<&Bound>, label: &str| {
            bound
                .map(|b| resolve_bound(b, column_type))
                .transpose()
                .map_err(|BoundError(msg)| BoundError(format!("{label} {msg}")))
        };
        Self::new(resolve(min, "min")?, resolve(max, "max")?)
    }
}

impl Constraint for RangeConstraint {
    fn name(&self) -> &str {
        "range"
    }

    fn evaluate(&self, column: &ColumnContext<'_>, violations: &mut Vec<Violation>) {
        for (row, state) in column.states.iter().enumerate() {
            let CellState::Valid(Some(value)) = state else {
                continue;
            };
            if let Some(min) = &self.min {
                if value.compare(min) == Some(Ordering::Less) {
                    violations.push(column.violation(
                        row,
                        RuleKind::Min,
                        format!("value {} is below minimum {min}", column.cells[row]),
                    ));
                }
            }
            if let Some(max) = &self.max {
                if value.compare(max) == Some(Ordering::Greater) {
                    violations.push(column.violation(
                        row,
                        RuleKind::Max,
                        format!("value {} is above maximum {max}", column.cells[row]),
                    ));
                }
            }
        }
    }

    fn description(&self) -> Option<String> {
        match (&self.min, &self.max) {
            (Some(lo), Some(hi)) => Some(format!("values between {lo} and {hi}")),
            (Some(lo), None) => Some(format!("values >= {lo}")),
            (None, Some(hi)) => Some(format!("values <= {hi}")),
            (None, None) => None,
        }
    }
}
