//! JSON and NDJSON file source implementation.
//!
//! Records are decoded with `serde_json` rather than DataFusion's JSON reader:
//! the latter rejects a field whose values change type between records, and
//! such mixed columns are exactly what validation should report on.

use super::{ensure_file, DataSource};
use crate::core::{CellValue, Table};
use crate::log_data_op;
use crate::logging::LogConfig;
use crate::prelude::*;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Layout of a JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormatType {
    /// A top-level array of records; anything else is read as NDJSON
    Json,
    /// Line-delimited JSON (one record per line)
    NdJson,
}

impl JsonFormatType {
    /// Detects the layout from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("jsonl" | "ndjson") => Self::NdJson,
            _ => Self::Json,
        }
    }
}

/// A JSON file of records, one object per row.
///
/// Columns appear in the order their keys are first seen. A record without a
/// key loads as a null in that column. Nested arrays and objects load as their
/// JSON text.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
    format: JsonFormatType,
    log: LogConfig,
}

impl JsonSource {
    /// Creates a new JSON source, detecting the layout from the extension.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let format = JsonFormatType::from_path(&path);
        Self::with_format(path, format)
    }

    /// Creates a new JSON source with an explicit layout.
    pub fn with_format(path: impl AsRef<Path>, format: JsonFormatType) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
            log: LogConfig::default(),
        }
    }

    /// Sets the logging configuration used while loading.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// The layout this source reads.
    pub fn format(&self) -> JsonFormatType {
        self.format
    }
}

#[async_trait]
impl DataSource for JsonSource {
    #[instrument(skip(self), fields(
        source.type = "json",
        source.path = %self.path.display(),
        json.format = ?self.format
    ))]
    async fn load(&self) -> Result<Table> {
        ensure_file(&self.path, "json").await?;
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TableGuardError::data_source_with_source(
                "json",
                format!("cannot read {}", self.path.display()),
                Box::new(e),
            )
        })?;

        let records = match self.format {
            JsonFormatType::Json if text.trim_start().starts_with('[') => {
                debug!("Reading JSON array");
                parse_array(&text)?
            }
            _ => {
                debug!("Reading line-delimited JSON");
                parse_lines(&text)?
            }
        };
        let table = records_to_table(records)?;

        log_data_op!(
            self.log,
            source.type = "json",
            source.path = %self.path.display(),
            table.rows = table.num_rows(),
            table.columns = table.num_columns(),
            "Loaded JSON data source"
        );
        Ok(table)
    }

    fn description(&self) -> String {
        match self.format {
            JsonFormatType::Json => format!("JSON file: {}", self.path.display()),
            JsonFormatType::NdJson => format!("NDJSON file: {}", self.path.display()),
        }
    }
}

fn parse_array(text: &str) -> Result<Vec<Value>> {
    serde_json::from_str(text).map_err(|e| {
        TableGuardError::data_source_with_source("json", "invalid JSON array", Box::new(e))
    })
}

fn parse_lines(text: &str) -> Result<Vec<Value>> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .enumerate()
        .map(|(index, value)| {
            value.map_err(|e| {
                TableGuardError::data_source_with_source(
                    "json",
                    format!("invalid JSON record #{index} at line {}", e.line()),
                    Box::new(e),
                )
            })
        })
        .collect()
}

fn json_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Integer(i),
            None => n.as_f64().map_or(CellValue::Null, CellValue::real),
        },
        Value::String(s) => CellValue::text(s),
        nested @ (Value::Array(_) | Value::Object(_)) => CellValue::Text(nested.to_string()),
    }
}

/// Pivots JSON records into columns.
fn records_to_table(records: Vec<Value>) -> Result<Table> {
    let num_rows = records.len();
    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<Vec<CellValue>> = Vec::new();

    for (row, record) in records.into_iter().enumerate() {
        let Value::Object(fields) = record else {
            return Err(TableGuardError::data_source(
                "json",
                format!("record #{row} is not an object"),
            ));
        };
        for (key, value) in fields {
            let position = match positions.get(&key) {
                Some(&position) => position,
                None => {
                    positions.insert(key.clone(), names.len());
                    names.push(key);
                    columns.push(Vec::with_capacity(num_rows));
                    names.len() - 1
                }
            };
            let cells = &mut columns[position];
            cells.resize(row, CellValue::Null);
            cells.push(json_cell(value));
        }
    }

    let mut builder = Table::builder();
    for (name, mut cells) in names.into_iter().zip(columns) {
        cells.resize(num_rows, CellValue::Null);
        builder = builder.cells(name, cells);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(JsonFormatType::from_path("a.json"), JsonFormatType::Json);
        assert_eq!(JsonFormatType::from_path("a.JSONL"), JsonFormatType::NdJson);
        assert_eq!(JsonFormatType::from_path("a.ndjson"), JsonFormatType::NdJson);
    }

    #[tokio::test]
    async fn test_json_array() {
        let file = write_temp(
            ".json",
            r#"[
                {"id": 1, "email": "a@x.com", "score": 1.5},
                {"id": 2, "email": null, "active": true},
                {"id": "three", "tags": [1, 2]}
            ]"#,
        );
        let table = JsonSource::new(file.path()).load().await.unwrap();

        assert_eq!(table.num_rows(), 3);
        let names: Vec<_> = table.column_names().iter().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "email", "score", "active", "tags"]);

        let ids = table.column("id").unwrap();
        assert_eq!(ids[0], CellValue::Integer(1));
        assert_eq!(ids[2], CellValue::text("three"));
        assert_eq!(table.column("email").unwrap()[1], CellValue::Null);
        assert_eq!(table.column("score").unwrap()[2], CellValue::Null);
        assert_eq!(table.column("active").unwrap()[0], CellValue::Null);
        assert_eq!(table.column("active").unwrap()[1], CellValue::Boolean(true));
        assert_eq!(table.column("tags").unwrap()[2], CellValue::text("[1,2]"));
    }

    #[tokio::test]
    async fn test_json_falls_back_to_lines() {
        let file = write_temp(".json", "{\"a\": 1}\n{\"a\": 2}\n");
        let source = JsonSource::new(file.path());
        assert_eq!(source.format(), JsonFormatType::Json);
        let table = source.load().await.unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("a").unwrap()[1], CellValue::Integer(2));
    }

    #[tokio::test]
    async fn test_ndjson() {
        let file = write_temp(".jsonl", "{\"a\": 1, \"b\": \"\"}\n\n{\"b\": \"x\"}\n");
        let table = JsonSource::new(file.path()).load().await.unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("a").unwrap()[1], CellValue::Null);
        assert_eq!(table.column("b").unwrap()[0], CellValue::Null);
        assert_eq!(table.column("b").unwrap()[1], CellValue::text("x"));
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_table() {
        let file = write_temp(".json", "  \n");
        let table = JsonSource::new(file.path()).load().await.unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 0);
    }

    #[tokio::test]
    async fn test_invalid_records() {
        let file = write_temp(".json", "[1, 2]");
        let err = JsonSource::new(file.path()).load().await.unwrap_err();
        assert!(err.to_string().contains("record #0 is not an object"));

        let file = write_temp(".jsonl", "{\"a\": 1}\n{oops}\n");
        let err = JsonSource::new(file.path()).load().await.unwrap_err();
        assert!(err.to_string().contains("invalid JSON record #1"));
    }
}
