//! YAML rule configuration.
//!
//! ```yaml
//! rules:
//!   - column: age
//!     type: int
//!     min: 0
//!     max: 120
//!     not_null: true
//!   - column: email
//!     regex: "^[^@]+@[^@]+\\.[^@]+$"
//!   - column: signup_date
//!     type: date
//!     min: "2020-01-01"
//!   - column: user_id
//!     unique: true
//! ```
//!
//! Unknown keys, unknown types, and rules without a column name abort loading.

use crate::core::ColumnRule;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// An ordered list of column rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    #[serde(default)]
    rules: Vec<ColumnRule>,
}

impl RuleSet {
    /// Creates a rule set from rules in evaluation order.
    pub fn new(rules: Vec<ColumnRule>) -> Self {
        Self { rules }
    }

    /// Parses a rule set from YAML text.
    ///
    /// An empty document is an empty rule set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use table_guard::config::RuleSet;
    /// use table_guard::core::ColumnType;
    ///
    /// let rules = RuleSet::from_yaml_str(
    ///     "rules:\n  - column: age\n    type: int\n    min: 0\n",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(rules.len(), 1);
    /// assert_eq!(rules.rules()[0].column_type, Some(ColumnType::Int));
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        let rule_set: RuleSet = serde_yaml::from_value(value)?;
        rule_set.validate()?;
        Ok(rule_set)
    }

    /// Reads and parses a YAML rule file.
    #[instrument(skip_all, fields(config.path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule file {}", path.display()))?;
        let rule_set = Self::from_yaml_str(&yaml).map_err(|e| match e {
            TableGuardError::Yaml(inner) => TableGuardError::Configuration(format!(
                "{}: {inner}",
                path.display()
            )),
            other => other,
        })?;
        debug!(rules = rule_set.len(), "Loaded rule set");
        Ok(rule_set)
    }

    /// Checks structural invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.column.trim().is_empty() {
                return Err(TableGuardError::Configuration(format!(
                    "rule #{index} has an empty 'column'"
                )));
            }
        }
        Ok(())
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Serializes the rule set back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl From<Vec<ColumnRule>> for RuleSet {
    fn from(rules: Vec<ColumnRule>) -> Self {
        Self::new(rules)
    }
}

impl AsRef<[ColumnRule]> for RuleSet {
    fn as_ref(&self) -> &[ColumnRule] {
        &self.rules
    }
}
