//! File loaders that turn datasets into normalized [`Table`]s.
//!
//! The format is chosen from the file extension:
//!
//! | Extension | Source |
//! |-----------|--------|
//! | `.csv`, `.tsv` | [`CsvSource`] |
//! | `.json` | [`JsonSource`] (array of records, or one record per line) |
//! | `.jsonl`, `.ndjson` | [`JsonSource`] (one record per line) |
//! | `.parquet` | [`ParquetSource`] |
//! | `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods` | [`ExcelSource`] (first worksheet) |
//!
//! CSV and TSV fields load as text and are typed by the rules that check
//! them. Parquet keeps its Arrow schema, and JSON and Excel keep the type of
//! each value as stored.

use crate::core::Table;
use crate::logging::LogConfig;
use crate::prelude::*;
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;
use tracing::instrument;

mod convert;
mod csv;
mod excel;
mod json;
mod parquet;

pub use convert::{array_to_cells, batches_to_table};
pub use csv::{CsvOptions, CsvSource};
pub use excel::ExcelSource;
pub use json::{JsonFormatType, JsonSource};
pub use parquet::ParquetSource;

/// A dataset that can be loaded into a [`Table`].
///
/// # Examples
///
/// ```rust,no_run
/// use table_guard::sources::{CsvSource, DataSource};
///
/// # async fn example() -> table_guard::prelude::Result<()> {
/// let source = CsvSource::new("data/users.csv");
/// let table = source.load().await?;
/// println!("{} rows from {}", table.num_rows(), source.description());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Reads the whole dataset into memory.
    async fn load(&self) -> Result<Table>;

    /// Returns a human-readable description of this data source.
    fn description(&self) -> String;
}

/// Input formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma separated values
    Csv,
    /// Tab separated values
    Tsv,
    /// JSON array of records, falling back to one record per line
    Json,
    /// One JSON record per line
    NdJson,
    /// Apache Parquet
    Parquet,
    /// Excel or OpenDocument spreadsheet
    Excel,
}

impl FileFormat {
    /// Detects the format from the path's extension, case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::NdJson),
            "parquet" => Ok(Self::Parquet),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Excel),
            "" => Err(TableGuardError::UnsupportedFormat(format!(
                "{}: file has no extension",
                path.display()
            ))),
            other => Err(TableGuardError::UnsupportedFormat(format!(
                "{}: unrecognized extension '.{other}'",
                path.display()
            ))),
        }
    }

    /// Short name used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::NdJson => "ndjson",
            Self::Parquet => "parquet",
            Self::Excel => "excel",
        }
    }
}

/// Builds the source for a path, choosing the loader by extension.
pub fn source_for_path(path: impl AsRef<Path>, log: LogConfig) -> Result<Box<dyn DataSource>> {
    let path = path.as_ref();
    let source: Box<dyn DataSource> = match FileFormat::from_path(path)? {
        FileFormat::Csv => Box::new(CsvSource::new(path).with_log_config(log)),
        FileFormat::Tsv => Box::new(
            CsvSource::with_options(path, CsvOptions::tsv()).with_log_config(log),
        ),
        FileFormat::Json => Box::new(JsonSource::new(path).with_log_config(log)),
        FileFormat::NdJson => Box::new(
            JsonSource::with_format(path, JsonFormatType::NdJson).with_log_config(log),
        ),
        FileFormat::Parquet => Box::new(ParquetSource::new(path).with_log_config(log)),
        FileFormat::Excel => Box::new(ExcelSource::new(path).with_log_config(log)),
    };
    Ok(source)
}

/// Loads a dataset file into a [`Table`] using the default log configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use table_guard::sources::load_table;
///
/// # async fn example() -> table_guard::prelude::Result<()> {
/// let table = load_table("data/customers.parquet").await?;
/// assert!(table.has_column("customer_id"));
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all, fields(source.path = %path.as_ref().display()))]
pub async fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    source_for_path(path, LogConfig::default())?.load().await
}

/// Checks that the file exists before handing it to a reader.
pub(crate) async fn ensure_file(path: &Path, source_type: &str) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(TableGuardError::data_source(
            source_type,
            format!("{} is not a file", path.display()),
        )),
        Err(e) => Err(TableGuardError::data_source_with_source(
            source_type,
            format!("cannot open {}", path.display()),
            Box::new(e),
        )),
    }
}

/// DataFusion takes paths as strings.
pub(crate) fn path_str<'a>(path: &'a Path, source_type: &str) -> Result<&'a str> {
    path.to_str().ok_or_else(|| {
        TableGuardError::data_source(
            source_type,
            format!("path {} is not valid UTF-8", path.display()),
        )
    })
}

/// The path's extension with its leading dot, as DataFusion expects it.
pub(crate) fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}
