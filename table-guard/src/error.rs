//! Error types for table-guard.
//!
//! Content problems in the data (nulls, type mismatches, out-of-range values,
//! duplicates, missing columns) are never errors: they become
//! [`Violation`](crate::core::Violation)s in the validation result. The
//! variants here cover the fatal cases only: configuration that cannot be
//! parsed, rules the engine cannot interpret, and input that cannot be loaded.

use thiserror::Error;

/// The main error type for table-guard.
#[derive(Error, Debug)]
pub enum TableGuardError {
    /// A rule could not be compiled into an executable check.
    ///
    /// `index` is the zero-based position of the rule in the rule set, so two
    /// rules on the same column can still be told apart.
    #[error("Invalid rule #{index} for column '{column}': {message}")]
    InvalidRule {
        /// Position of the rule in the rule set
        index: usize,
        /// Column the rule targets
        column: String,
        /// Why the rule was rejected
        message: String,
    },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from data source operations.
    #[error("Data source error ({source_type}): {message}")]
    DataSource {
        /// Type of data source (e.g., "csv", "parquet", "json")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The input file format is not supported.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when parsing the YAML rule configuration.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, TableGuardError>`.
pub type Result<T> = std::result::Result<T, TableGuardError>;

impl TableGuardError {
    /// Creates a new invalid rule error.
    pub fn invalid_rule(
        index: usize,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRule {
            index,
            column: column.into(),
            message: message.into(),
        }
    }

    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<TableGuardError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            TableGuardError::Internal(inner) => TableGuardError::Internal(format!("{}: {inner}", f())),
            TableGuardError::Configuration(inner) => {
                TableGuardError::Configuration(format!("{}: {inner}", f()))
            }
            other => TableGuardError::Internal(format!("{}: {other}", f())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_rule_names_rule() {
        let err = TableGuardError::invalid_rule(2, "age", "min bound 'abc' is not a number");
        assert_eq!(
            err.to_string(),
            "Invalid rule #2 for column 'age': min bound 'abc' is not a number"
        );
    }

    #[test]
    fn test_data_source_error() {
        let err = TableGuardError::data_source("csv", "Invalid file format");
        assert_eq!(err.to_string(), "Data source error (csv): Invalid file format");
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = TableGuardError::data_source_with_source(
            "parquet",
            "Could not open file",
            Box::new(source),
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(TableGuardError::Internal("Something went wrong".to_string()))
        }

        let err = failing_operation()
            .with_context(|| "While loading rules".to_string())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Internal error: While loading rules: Something went wrong"
        );
    }

    #[test]
    fn test_configuration_context_keeps_variant() {
        let result: Result<()> = Err(TableGuardError::Configuration("bad key".to_string()));
        let err = result.with_context(|| "rules.yaml".to_string()).unwrap_err();
        assert!(matches!(err, TableGuardError::Configuration(_)));
        assert!(err.to_string().contains("rules.yaml: bad key"));
    }
}
