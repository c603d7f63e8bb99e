//! Where a newly built stage goes.

use std::fmt;

/// Destination of a stage: the main sequence or a named sub-pipeline.
///
/// String types convert into `Target::SubPipeline`, so
/// `builder.limit(10, "paging")` routes into the `paging` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Target {
    /// Append to the main sequence.
    #[default]
    Main,
    /// Append to the named sub-pipeline.
    SubPipeline(String),
}

impl Target {
    /// Targets the named sub-pipeline.
    #[must_use]
    pub fn sub_pipeline(name: impl Into<String>) -> Self {
        Self::SubPipeline(name.into())
    }

    /// Returns the sub-pipeline name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Main => None,
            Self::SubPipeline(name) => Some(name),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::SubPipeline(name) => write!(f, "sub-pipeline '{name}'"),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::SubPipeline(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::SubPipeline(name)
    }
}

impl From<&String> for Target {
    fn from(name: &String) -> Self {
        Self::SubPipeline(name.clone())
    }
}

impl From<Option<String>> for Target {
    fn from(name: Option<String>) -> Self {
        name.map_or(Self::Main, Self::SubPipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Target::from("paging"), Target::sub_pipeline("paging"));
        assert_eq!(Target::from(None::<String>), Target::Main);
        assert_eq!(Target::from(Some("x".to_string())).name(), Some("x"));
        assert_eq!(Target::default(), Target::Main);
    }

    #[test]
    fn test_display() {
        assert_eq!(Target::Main.to_string(), "main");
        assert_eq!(Target::from("a").to_string(), "sub-pipeline 'a'");
    }
}
