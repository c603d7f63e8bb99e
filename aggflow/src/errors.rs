//! Error types for the aggflow builder.
//!
//! Only conditional matches fail at the builder layer. Everything else is
//! either a collaborator failure (relation lookups) or an ambient failure
//! (configuration, serialization).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Error code for a conditional match referencing an absent sub-pipeline.
pub const MISSING_SUBPIPELINE_CODE: &str = "BUILDER-001-MISSING_SUBPIPELINE";

/// Error code for a conditional match reusing a sub-pipeline name.
pub const DUPLICATE_REFERENCE_CODE: &str = "BUILDER-002-DUPLICATE_REFERENCE";

/// The main error type for aggflow operations.
#[derive(Debug, Error)]
pub enum AggflowError {
    /// A conditional match referenced a sub-pipeline that does not exist.
    #[error("{0}")]
    MissingSubPipeline(#[from] MissingSubPipelineError),

    /// A conditional match used the same sub-pipeline name twice.
    #[error("{0}")]
    DuplicateSubPipelineReference(#[from] DuplicateReferenceError),

    /// The relation resolver failed.
    #[error("{0}")]
    Resolver(#[from] ResolverError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AggflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Metadata about a builder error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorInfo {
    /// Error code (e.g., "BUILDER-001-MISSING_SUBPIPELINE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ErrorInfo {
    /// Creates new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code));
        map.insert("summary".to_string(), serde_json::json!(self.summary));
        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::json!(hint));
        }
        if !self.context.is_empty() {
            map.insert("context".to_string(), serde_json::json!(self.context));
        }
        map
    }
}

/// Raised when a conditional match names sub-pipelines that were never built.
#[derive(Debug, Clone, Error)]
#[error("Missing sub-pipeline(s): {}", missing.join(", "))]
pub struct MissingSubPipelineError {
    /// The missing names, once each, in argument order.
    pub missing: Vec<String>,
    /// Diagnostic info.
    pub error_info: ErrorInfo,
}

impl MissingSubPipelineError {
    /// Creates a new missing sub-pipeline error.
    #[must_use]
    pub fn new(missing: Vec<String>) -> Self {
        let info = ErrorInfo::new(
            MISSING_SUBPIPELINE_CODE,
            format!("Conditional match requires sub-pipeline(s): {}", missing.join(", ")),
        )
        .with_fix_hint("Route at least one stage to each named sub-pipeline before the conditional match.");

        Self {
            missing,
            error_info: info,
        }
    }
}

/// Raised when a conditional match reuses a name and reuse is rejected.
#[derive(Debug, Clone, Error)]
#[error("Sub-pipeline '{name}' referenced more than once in one conditional match")]
pub struct DuplicateReferenceError {
    /// The repeated name.
    pub name: String,
    /// Diagnostic info.
    pub error_info: ErrorInfo,
}

impl DuplicateReferenceError {
    /// Creates a new duplicate reference error.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let info = ErrorInfo::new(
            DUPLICATE_REFERENCE_CODE,
            format!("Sub-pipeline '{name}' used for more than one branch"),
        )
        .with_fix_hint("Build a separate sub-pipeline for each branch, or allow branch reuse in the builder config.")
        .with_context_entry("name", name.clone());

        Self {
            name,
            error_info: info,
        }
    }
}

/// Raised by a relation resolver when a schema lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Relation lookup failed for field '{field}': {message}")]
pub struct ResolverError {
    /// The field being resolved.
    pub field: String,
    /// What went wrong.
    pub message: String,
}

impl ResolverError {
    /// Creates a new resolver error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_info_creation() {
        let info = ErrorInfo::new("TEST-001", "Test error")
            .with_fix_hint("Fix this by doing that")
            .with_context_entry("name", "ageFilter");

        assert_eq!(info.code, "TEST-001");
        assert_eq!(info.fix_hint, Some("Fix this by doing that".to_string()));
        assert_eq!(info.context.get("name"), Some(&"ageFilter".to_string()));

        let dict = info.to_dict();
        assert_eq!(dict.get("code").unwrap(), "TEST-001");
        assert!(dict.contains_key("context"));
    }

    #[test]
    fn test_missing_sub_pipeline_message() {
        let err = MissingSubPipelineError::new(vec!["ageFilter".to_string(), "cityFilter".to_string()]);

        assert_eq!(err.to_string(), "Missing sub-pipeline(s): ageFilter, cityFilter");
        assert_eq!(err.error_info.code, MISSING_SUBPIPELINE_CODE);
    }

    #[test]
    fn test_duplicate_reference_message() {
        let err = DuplicateReferenceError::new("ageFilter");

        assert!(err.to_string().contains("'ageFilter'"));
        assert_eq!(err.error_info.code, DUPLICATE_REFERENCE_CODE);
    }

    #[test]
    fn test_conversions() {
        let err: AggflowError = ResolverError::new("author", "schema unavailable").into();
        assert!(matches!(err, AggflowError::Resolver(_)));
        assert!(err.to_string().contains("author"));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AggflowError = json_err.into();
        assert!(matches!(err, AggflowError::Serialization(_)));
    }
}
