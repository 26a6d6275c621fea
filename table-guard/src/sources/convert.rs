//! Arrow record batches to [`Table`] conversion.

use crate::core::{CellValue, Table};
use crate::prelude::*;
use chrono::NaiveTime;
use datafusion::arrow::array::{Array, AsArray};
use datafusion::arrow::compute::cast;
use datafusion::arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float64Type, Int64Type, Schema, TimeUnit,
    TimestampMicrosecondType, UInt64Type,
};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::arrow::util::display::{ArrayFormatter, FormatOptions};

/// Converts one Arrow array into tagged cells.
///
/// Integers become [`CellValue::Integer`] (unsigned values above `i64::MAX`
/// fall back to reals), floats become reals, strings become text, and dates
/// become dates. Timestamps at exactly midnight become dates, so date-only
/// values written as timestamps still satisfy a `date` rule; other timestamps
/// and any other type are rendered with Arrow's display formatter.
pub fn array_to_cells(array: &dyn Array) -> Result<Vec<CellValue>> {
    let len = array.len();
    let mut cells = Vec::with_capacity(len);

    match array.data_type() {
        DataType::Null => cells.resize(len, CellValue::Null),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let ints = cast(array, &DataType::Int64)?;
            let ints = ints.as_primitive::<Int64Type>();
            cells.extend(ints.iter().map(CellValue::from));
        }
        DataType::UInt64 => {
            let ints = array.as_primitive::<UInt64Type>();
            cells.extend(ints.iter().map(|v| match v {
                Some(v) => i64::try_from(v).map_or_else(|_| CellValue::real(v as f64), CellValue::Integer),
                None => CellValue::Null,
            }));
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let reals = cast(array, &DataType::Float64)?;
            let reals = reals.as_primitive::<Float64Type>();
            cells.extend(reals.iter().map(CellValue::from));
        }
        DataType::Boolean => {
            cells.extend(array.as_boolean().iter().map(CellValue::from));
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let text = cast(array, &DataType::Utf8)?;
            cells.extend(text.as_string::<i32>().iter().map(CellValue::from));
        }
        DataType::Date32 => {
            let dates = array.as_primitive::<Date32Type>();
            cells.extend((0..len).map(|i| {
                if dates.is_null(i) {
                    CellValue::Null
                } else {
                    dates.value_as_date(i).into()
                }
            }));
        }
        DataType::Date64 => {
            let dates = array.as_primitive::<Date64Type>();
            cells.extend((0..len).map(|i| {
                if dates.is_null(i) {
                    CellValue::Null
                } else {
                    dates.value_as_date(i).into()
                }
            }));
        }
        DataType::Timestamp(_, _) => {
            let micros = cast(array, &DataType::Timestamp(TimeUnit::Microsecond, None))?;
            let micros = micros.as_primitive::<TimestampMicrosecondType>();
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            cells.extend((0..len).map(|i| {
                if array.is_null(i) {
                    return CellValue::Null;
                }
                match micros.value_as_datetime(i) {
                    Some(ts) if ts.time() == NaiveTime::MIN => CellValue::Date(ts.date()),
                    _ => CellValue::text(formatter.value(i).to_string()),
                }
            }));
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            cells.extend((0..len).map(|i| {
                if array.is_null(i) {
                    CellValue::Null
                } else {
                    CellValue::text(formatter.value(i).to_string())
                }
            }));
        }
    }

    Ok(cells)
}

/// Concatenates record batches into a [`Table`], keeping schema column order.
pub fn batches_to_table(schema: &Schema, batches: &[RecordBatch]) -> Result<Table> {
    let mut builder = Table::builder();
    for (index, field) in schema.fields().iter().enumerate() {
        let mut cells = Vec::new();
        for batch in batches {
            cells.extend(array_to_cells(batch.column(index).as_ref())?);
        }
        builder = builder.cells(field.name().clone(), cells);
    }
    builder.build()
}
