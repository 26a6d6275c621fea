//! Prelude for commonly used types and traits in table-guard.

pub use crate::config::RuleSet;
pub use crate::core::{ColumnRule, ColumnType, Table, ValidationResult, Validator};
pub use crate::error::{ErrorContext, Result, TableGuardError};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
