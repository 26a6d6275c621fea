//! Excel and OpenDocument spreadsheet source implementation.

use super::{ensure_file, DataSource};
use crate::core::{CellValue, Table};
use crate::log_data_op;
use crate::logging::LogConfig;
use crate::prelude::*;
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveTime};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// The first worksheet of a workbook (`.xlsx`, `.xlsm`, `.xlsb`, `.xls` or
/// `.ods`), read with calamine.
///
/// The first row holds the column names; a blank header cell is named
/// `column_<n>` after its 1-based position. Date cells at midnight load as
/// dates, other date-times as ISO 8601 text. Error cells such as `#DIV/0!`
/// load as their text.
#[derive(Debug, Clone)]
pub struct ExcelSource {
    path: PathBuf,
    log: LogConfig,
}

impl ExcelSource {
    /// Creates a new workbook source from a single file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            log: LogConfig::default(),
        }
    }

    /// Sets the logging configuration used while loading.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

#[async_trait]
impl DataSource for ExcelSource {
    #[instrument(skip(self), fields(source.type = "excel", source.path = %self.path.display()))]
    async fn load(&self) -> Result<Table> {
        ensure_file(&self.path, "excel").await?;

        let path = self.path.clone();
        let range = tokio::task::spawn_blocking(move || read_first_sheet(&path))
            .await
            .map_err(|e| TableGuardError::Internal(format!("workbook reader task failed: {e}")))??;
        debug!(
            rows = range.height(),
            columns = range.width(),
            "Read first worksheet"
        );
        let table = range_to_table(&range)?;

        log_data_op!(
            self.log,
            source.type = "excel",
            source.path = %self.path.display(),
            table.rows = table.num_rows(),
            table.columns = table.num_columns(),
            "Loaded Excel data source"
        );
        Ok(table)
    }

    fn description(&self) -> String {
        format!("Excel workbook: {}", self.path.display())
    }
}

fn read_first_sheet(path: &Path) -> Result<Range<Data>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        TableGuardError::data_source_with_source(
            "excel",
            format!("cannot open workbook {}", path.display()),
            Box::new(e),
        )
    })?;
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(TableGuardError::data_source_with_source(
            "excel",
            format!("cannot read first worksheet of {}", path.display()),
            Box::new(e),
        )),
        None => Err(TableGuardError::data_source(
            "excel",
            format!("{} has no worksheets", path.display()),
        )),
    }
}

/// Builds a table from a worksheet whose first row is the header.
fn range_to_table(range: &Range<Data>) -> Result<Table> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Table::builder().build();
    };

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); header.len()];
    for row in rows {
        for (index, column) in columns.iter_mut().enumerate() {
            column.push(row.get(index).map_or(CellValue::Null, cell_value));
        }
    }

    let mut builder = Table::builder();
    for (index, (name, cells)) in header.iter().zip(columns).enumerate() {
        let name = name.to_string().trim().to_string();
        let name = if name.is_empty() {
            format!("column_{}", index + 1)
        } else {
            name
        };
        builder = builder.cells(name, cells);
    }
    builder.build()
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(value) => CellValue::Integer(*value),
        Data::Float(value) => CellValue::real(*value),
        Data::Bool(value) => CellValue::Boolean(*value),
        Data::String(value) => CellValue::text(value.as_str()),
        Data::DateTime(value) => match value.as_datetime() {
            Some(ts) if !value.is_duration() && ts.time() == NaiveTime::MIN => {
                CellValue::Date(ts.date())
            }
            Some(ts) if !value.is_duration() => {
                CellValue::text(ts.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            _ => CellValue::text(cell.to_string()),
        },
        Data::DateTimeIso(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_or_else(|_| CellValue::text(value.as_str()), CellValue::Date),
        other => CellValue::text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnRule, ColumnType, Validator};
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_workbook(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("customers.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "id").unwrap();
        sheet.write_string(0, 1, "name").unwrap();
        sheet.write_string(0, 2, "active").unwrap();
        sheet.write_number(1, 0, 1).unwrap();
        sheet.write_string(1, 1, "Alice").unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        sheet.write_number(2, 0, 2.5).unwrap();
        sheet.write_boolean(2, 2, false).unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_excel_load() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir);

        let table = ExcelSource::new(&path).load().await.unwrap();
        assert_eq!(
            table.column_names(),
            &["id".to_string(), "name".to_string(), "active".to_string()]
        );
        assert_eq!(table.num_rows(), 2);

        // xlsx stores every number as a float
        let ids = table.column("id").unwrap();
        assert!(ids[0] == CellValue::Integer(1) || ids[0] == CellValue::Real(1.0));
        assert_eq!(ids[1], CellValue::real(2.5));
        assert_eq!(table.column("name").unwrap()[0], CellValue::text("Alice"));
        assert_eq!(table.column("name").unwrap()[1], CellValue::Null);
        assert_eq!(table.column("active").unwrap()[1], CellValue::Boolean(false));

        let rules = [ColumnRule::new("id").with_type(ColumnType::Int)];
        let result = Validator::new().validate(&table, &rules).unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].row_index, Some(1));
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Null);
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Integer(7));
        assert_eq!(cell_value(&Data::String("  ".into())), CellValue::Null);
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-01-31".into())),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-01-31T10:00:00".into())),
            CellValue::text("2024-01-31T10:00:00")
        );
    }

    #[test]
    fn test_blank_header_is_named_by_position() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("id".into()));
        range.set_value((1, 0), Data::Int(1));
        range.set_value((1, 1), Data::String("x".into()));

        let table = range_to_table(&range).unwrap();
        assert_eq!(table.column_names(), &["id".to_string(), "column_2".to_string()]);
        assert_eq!(table.column("column_2").unwrap()[0], CellValue::text("x"));
    }

    #[test]
    fn test_empty_sheet() {
        let table = range_to_table(&Range::empty()).unwrap();
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.num_rows(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "not a zip archive").unwrap();

        let err = ExcelSource::new(&path).load().await.unwrap_err();
        assert!(matches!(err, TableGuardError::DataSource { .. }));
        assert!(err.to_string().contains("cannot open workbook"));
    }
}
