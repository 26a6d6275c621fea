//! Report rendering for validation results.
//!
//! Three renderers share the [`ResultFormatter`] trait:
//!
//! - [`JsonFormatter`]: the result serialized losslessly, for pipelines
//! - [`MarkdownFormatter`]: a summary plus one table row per violation
//! - [`HumanFormatter`]: a short console summary
//!
//! Output depends only on the result, so rendering the same result twice
//! produces identical bytes. [`write_reports`] writes the JSON and Markdown
//! artifacts side by side.
//!
//! # Examples
//!
//! ```rust
//! use table_guard::core::{ColumnRule, Table, Validator};
//! use table_guard::formatters::{MarkdownFormatter, ResultFormatter};
//!
//! let table = Table::builder().column("id", vec![1i64, 1]).build().unwrap();
//! let result = Validator::new()
//!     .validate(&table, &[ColumnRule::new("id").unique()])
//!     .unwrap();
//!
//! let markdown = MarkdownFormatter::new().format(&result).unwrap();
//! assert!(markdown.contains("| `id` | 1 | unique |"));
//! ```

use crate::core::{RuleKind, ValidationResult, Violation};
use crate::prelude::*;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration options for rendering validation results.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the per-kind violation counts
    pub include_counts: bool,
    /// Include individual violations
    pub include_violations: bool,
    /// Maximum number of violations to display (`None` for all)
    pub max_violations: Option<usize>,
    /// Whether to use colorized output (human formatter only)
    pub use_colors: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_counts: true,
            include_violations: true,
            max_violations: None,
            use_colors: false,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_counts: false,
            include_violations: false,
            max_violations: Some(0),
            use_colors: false,
        }
    }

    /// Creates a configuration suitable for terminals.
    pub fn console() -> Self {
        Self {
            include_counts: true,
            include_violations: true,
            max_violations: Some(20),
            use_colors: true,
        }
    }

    /// Sets whether to include individual violations.
    pub fn with_violations(mut self, include: bool) -> Self {
        self.include_violations = include;
        self
    }

    /// Sets the maximum number of violations to display.
    pub fn with_max_violations(mut self, max: Option<usize>) -> Self {
        self.max_violations = max;
        self
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn visible<'a>(&self, violations: &'a [Violation]) -> &'a [Violation] {
        if !self.include_violations {
            return &[];
        }
        match self.max_violations {
            Some(max) => &violations[..max.min(violations.len())],
            None => violations,
        }
    }
}

/// Trait for rendering validation results into an output format.
pub trait ResultFormatter {
    /// Renders a validation result.
    fn format(&self, result: &ValidationResult) -> Result<String>;

    /// Renders a validation result with custom configuration.
    fn format_with_config(
        &self,
        result: &ValidationResult,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(result)
    }
}

/// Renders validation results as JSON.
///
/// The JSON output is always the complete result; [`FormatterConfig`] does not
/// filter it, so consumers can rely on every field being present.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a pretty-printing JSON formatter.
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, result: &ValidationResult) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(result)
        } else {
            serde_json::to_string(result)
        };
        json.map_err(|e| {
            TableGuardError::Serialization(format!("Failed to serialize result to JSON: {e}"))
        })
    }
}

/// Renders validation results as a Markdown report.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    /// Creates a Markdown formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 1,
        }
    }

    /// Creates a Markdown formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 1,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes text for use inside a Markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace(['\n', '\r'], " ")
}

/// Renders text as an inline code span inside a Markdown table cell.
///
/// The fence is one backtick longer than the longest run inside the text, and
/// text touching the fence is padded so the span still closes.
fn code_span(text: &str) -> String {
    let text = text.replace('|', "\\|").replace(['\n', '\r'], " ");
    let longest_run = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, result: &ValidationResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(
        &self,
        result: &ValidationResult,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);
        let status = if result.passed { "PASSED" } else { "FAILED" };

        writeln!(output, "{h} Data Validation Report").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Status:** {status}").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Rows checked | {} |", result.total_rows).unwrap();
        writeln!(output, "| Columns | {} |", result.total_columns).unwrap();
        writeln!(output, "| Rows failed | {} |", result.rows_failed).unwrap();
        writeln!(output, "| Violations | {} |", result.violations.len()).unwrap();
        writeln!(output, "| Validation passed | {} |", result.passed).unwrap();

        if result.violations.is_empty() {
            writeln!(output).unwrap();
            writeln!(output, "No violations found.").unwrap();
            return Ok(output);
        }

        if config.include_counts {
            let counts = result.counts_by_kind();
            writeln!(output).unwrap();
            writeln!(output, "{h}# Violations by rule").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| Rule | Count |").unwrap();
            writeln!(output, "|------|-------|").unwrap();
            for kind in RuleKind::ALL {
                if let Some(count) = counts.get(&kind) {
                    writeln!(output, "| {kind} | {count} |").unwrap();
                }
            }
        }

        let shown = config.visible(&result.violations);
        if config.include_violations {
            writeln!(output).unwrap();
            writeln!(output, "{h}# Violations").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| Column | Row | Rule | Message | Value |").unwrap();
            writeln!(output, "|--------|-----|------|---------|-------|").unwrap();
            for violation in shown {
                let row = violation
                    .row_index
                    .map_or_else(|| "-".to_string(), |r| r.to_string());
                let value = violation
                    .value
                    .as_deref()
                    .map_or_else(|| "-".to_string(), code_span);
                writeln!(
                    output,
                    "| {} | {row} | {} | {} | {value} |",
                    code_span(&violation.column),
                    violation.rule_kind,
                    table_cell(&violation.message),
                )
                .unwrap();
            }

            let hidden = result.violations.len() - shown.len();
            if hidden > 0 {
                writeln!(output).unwrap();
                writeln!(
                    output,
                    "> **Note:** {hidden} additional violations not shown in this report."
                )
                .unwrap();
            }
        }

        Ok(output)
    }
}

/// Renders a short console summary.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a console formatter with the default console configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::console(),
        }
    }

    /// Creates a console formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, result: &ValidationResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(
        &self,
        result: &ValidationResult,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();

        let (open, close) = match (config.use_colors, result.passed) {
            (true, true) => ("\x1b[32m", "\x1b[0m"),
            (true, false) => ("\x1b[31m", "\x1b[0m"),
            (false, _) => ("", ""),
        };
        if result.passed {
            writeln!(output, "✅ {open}Validation PASSED{close}").unwrap();
        } else {
            writeln!(output, "❌ {open}Validation FAILED{close}").unwrap();
        }
        writeln!(
            output,
            "   Rows checked: {}  Rows failed: {}  Violations: {}",
            result.total_rows,
            result.rows_failed,
            result.violations.len()
        )
        .unwrap();

        if config.include_counts {
            for (kind, count) in result.counts_by_kind() {
                writeln!(output, "   {kind}: {count}").unwrap();
            }
        }

        let shown = config.visible(&result.violations);
        for violation in shown {
            let row = violation
                .row_index
                .map_or_else(|| "-".to_string(), |r| r.to_string());
            writeln!(
                output,
                "   - row {row}, column {}: [{}] {}",
                violation.column, violation.rule_kind, violation.message
            )
            .unwrap();
        }
        let hidden = result.violations.len() - shown.len();
        if config.include_violations && hidden > 0 {
            writeln!(output, "   ... and {hidden} more violations").unwrap();
        }

        Ok(output)
    }
}

/// Paths of the artifacts written by [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// The JSON report
    pub json: PathBuf,
    /// The Markdown report
    pub markdown: PathBuf,
}

/// Writes `<prefix>.json` and `<prefix>.md` for a result.
pub fn write_reports(result: &ValidationResult, prefix: impl AsRef<Path>) -> Result<ReportPaths> {
    let prefix = prefix.as_ref();
    let with_extension = |ext: &str| {
        let mut path = prefix.as_os_str().to_owned();
        path.push(ext);
        PathBuf::from(path)
    };
    let paths = ReportPaths {
        json: with_extension(".json"),
        markdown: with_extension(".md"),
    };

    let json = JsonFormatter::new().format(result)?;
    std::fs::write(&paths.json, json)
        .with_context(|| format!("Failed to write {}", paths.json.display()))?;

    let markdown = MarkdownFormatter::new().format(result)?;
    std::fs::write(&paths.markdown, markdown)
        .with_context(|| format!("Failed to write {}", paths.markdown.display()))?;

    info!(
        report.json = %paths.json.display(),
        report.markdown = %paths.markdown.display(),
        "Reports written"
    );
    Ok(paths)
}
