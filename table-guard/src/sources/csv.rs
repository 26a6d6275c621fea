//! CSV and TSV file source implementation.

use super::{batches_to_table, dotted_extension, ensure_file, path_str, DataSource};
use crate::core::Table;
use crate::log_data_op;
use crate::logging::LogConfig;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Escape character (default: None)
    pub escape: Option<u8>,
    /// Comment prefix (lines starting with this are ignored)
    pub comment: Option<u8>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            escape: None,
            comment: None,
        }
    }
}

impl CsvOptions {
    /// Options for tab separated files.
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }
}

/// A delimited text file loaded through DataFusion's CSV reader.
///
/// Every field is read as text and keeps its original spelling (`"007"`,
/// `"12.0"`), so a malformed value anywhere in the file becomes a rule
/// violation instead of a load error. Empty fields load as nulls.
///
/// # Examples
///
/// ```rust,no_run
/// use table_guard::sources::{CsvOptions, CsvSource, DataSource};
///
/// # async fn example() -> table_guard::prelude::Result<()> {
/// let table = CsvSource::new("data/users.csv").load().await?;
///
/// let options = CsvOptions {
///     delimiter: b';',
///     ..Default::default()
/// };
/// let table = CsvSource::with_options("data/export.csv", options).load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: CsvOptions,
    log: LogConfig,
}

impl CsvSource {
    /// Creates a new CSV source from a single file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_options(path, CsvOptions::default())
    }

    /// Creates a new CSV source with custom options.
    pub fn with_options(path: impl AsRef<Path>, options: CsvOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
            log: LogConfig::default(),
        }
    }

    /// Sets the logging configuration used while loading.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// The reading options.
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    fn read_options<'a>(&self, extension: &'a str) -> CsvReadOptions<'a> {
        let mut read_options = CsvReadOptions::new()
            .has_header(self.options.has_header)
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .file_extension(extension);
        if let Some(escape) = self.options.escape {
            read_options = read_options.escape(escape);
        }
        if let Some(comment) = self.options.comment {
            read_options = read_options.comment(comment);
        }
        read_options
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self), fields(
        source.type = "csv",
        source.path = %self.path.display(),
        csv.delimiter = %self.options.delimiter as char,
        csv.has_header = self.options.has_header
    ))]
    async fn load(&self) -> Result<Table> {
        ensure_file(&self.path, "csv").await?;
        let path = path_str(&self.path, "csv")?;
        let extension = dotted_extension(&self.path);

        let ctx = SessionContext::new();
        let header = ctx
            .read_csv(path, self.read_options(&extension).schema_infer_max_records(1))
            .await?;
        let text_schema = Schema::new(
            header
                .schema()
                .fields()
                .iter()
                .map(|field| Field::new(field.name(), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        );
        debug!(columns = text_schema.fields().len(), "Read CSV header");

        let df = ctx
            .read_csv(path, self.read_options(&extension).schema(&text_schema))
            .await?;
        let schema = df.schema().inner().clone();
        let batches = df.collect().await?;
        let table = batches_to_table(&schema, &batches)?;

        log_data_op!(
            self.log,
            source.type = "csv",
            source.path = %self.path.display(),
            table.rows = table.num_rows(),
            table.columns = table.num_columns(),
            "Loaded CSV data source"
        );
        Ok(table)
    }

    fn description(&self) -> String {
        format!("CSV file: {}", self.path.display())
    }
}
