//! Builder configuration.

use crate::errors::AggflowError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// How a conditional match treats a sub-pipeline name passed more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchReuse {
    /// Consume the entry once and copy its stages into every position naming it.
    #[default]
    Duplicate,
    /// Fail with a duplicate reference error.
    Reject,
}

/// Configuration for an aggregation builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Prefix of reserved sub-pipeline names.
    #[serde(default = "default_auto_name_prefix")]
    pub auto_name_prefix: String,
    /// Suffix appended to a joined field to name its attachment.
    #[serde(default = "default_attachment_suffix")]
    pub attachment_suffix: String,
    /// Foreign field used when a relation does not declare one.
    #[serde(default = "default_foreign_field")]
    pub foreign_field: String,
    /// Value a switch match yields when no case holds.
    #[serde(default)]
    pub switch_default: Value,
    /// Duplicate-name policy for conditional matches.
    #[serde(default)]
    pub branch_reuse: BranchReuse,
}

fn default_auto_name_prefix() -> String {
    "subPipeline".to_string()
}

fn default_attachment_suffix() -> String {
    "Details".to_string()
}

fn default_foreign_field() -> String {
    "_id".to_string()
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            auto_name_prefix: default_auto_name_prefix(),
            attachment_suffix: default_attachment_suffix(),
            foreign_field: default_foreign_field(),
            switch_default: Value::Null,
            branch_reuse: BranchReuse::default(),
        }
    }
}

impl BuilderConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `AggflowError::Config` if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, AggflowError> {
        serde_json::from_str(json).map_err(|e| AggflowError::Config(e.to_string()))
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or a config error if
    /// its content is malformed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AggflowError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Sets the reserved-name prefix.
    #[must_use]
    pub fn with_auto_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auto_name_prefix = prefix.into();
        self
    }

    /// Sets the attachment suffix.
    #[must_use]
    pub fn with_attachment_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.attachment_suffix = suffix.into();
        self
    }

    /// Sets the default foreign field.
    #[must_use]
    pub fn with_foreign_field(mut self, field: impl Into<String>) -> Self {
        self.foreign_field = field.into();
        self
    }

    /// Sets the switch fallback value.
    #[must_use]
    pub fn with_switch_default(mut self, value: impl Into<Value>) -> Self {
        self.switch_default = value.into();
        self
    }

    /// Sets the duplicate-name policy.
    #[must_use]
    pub fn with_branch_reuse(mut self, policy: BranchReuse) -> Self {
        self.branch_reuse = policy;
        self
    }
}
