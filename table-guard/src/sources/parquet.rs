//! Parquet file source implementation.

use super::{batches_to_table, dotted_extension, ensure_file, path_str, DataSource};
use crate::core::Table;
use crate::log_data_op;
use crate::logging::LogConfig;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::*;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A Parquet file loaded through DataFusion.
///
/// Column types come from the file's Arrow schema.
#[derive(Debug, Clone)]
pub struct ParquetSource {
    path: PathBuf,
    log: LogConfig,
}

impl ParquetSource {
    /// Creates a new Parquet source from a single file path.
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
impl DataSource for ParquetSource {
    #[instrument(skip(self), fields(source.type = "parquet", source.path = %self.path.display()))]
    async fn load(&self) -> Result<Table> {
        ensure_file(&self.path, "parquet").await?;
        let path = path_str(&self.path, "parquet")?;
        let extension = dotted_extension(&self.path);

        let read_options = ParquetReadOptions {
            file_extension: &extension,
            ..Default::default()
        };

        let ctx = SessionContext::new();
        let df = ctx.read_parquet(path, read_options).await?;
        let schema = df.schema().inner().clone();
        let batches = df.collect().await?;
        let table = batches_to_table(&schema, &batches)?;

        log_data_op!(
            self.log,
            source.type = "parquet",
            source.path = %self.path.display(),
            table.rows = table.num_rows(),
            table.columns = table.num_columns(),
            "Loaded Parquet data source"
        );
        Ok(table)
    }

    fn description(&self) -> String {
        format!("Parquet file: {}", self.path.display())
    }
}
