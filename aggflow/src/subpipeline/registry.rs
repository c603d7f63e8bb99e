//! Named, uncommitted stage lists.

use crate::core::Stage;
use std::collections::HashMap;

/// Table of sub-pipelines keyed by name.
///
/// Entries are created on first append and removed when taken. A name that
/// was never written and a name that was already taken look the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubPipelineRegistry {
    entries: HashMap<String, Vec<Stage>>,
}

impl SubPipelineRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage to `name`, creating the entry if needed.
    pub fn append(&mut self, name: impl Into<String>, stage: Stage) {
        self.entries.entry(name.into()).or_default().push(stage);
    }

    /// Removes and returns the stages stored under `name`.
    pub fn take(&mut self, name: &str) -> Option<Vec<Stage>> {
        self.entries.remove(name)
    }

    /// Returns the stages stored under `name` without removing them.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Stage]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Returns true if an entry exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the names of all live entries, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = SubPipelineRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn test_append_creates_then_grows() {
        let mut registry = SubPipelineRegistry::new();
        registry.append("paging", Stage::Skip(10));
        registry.append("paging", Stage::Limit(5));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("paging").unwrap(), &[Stage::Skip(10), Stage::Limit(5)]);
    }

    #[test]
    fn test_take_removes_entry() {
        let mut registry = SubPipelineRegistry::new();
        registry.append("paging", Stage::Limit(5));

        assert_eq!(registry.take("paging"), Some(vec![Stage::Limit(5)]));
        assert!(!registry.contains("paging"));
        assert_eq!(registry.take("paging"), None);
    }

    #[test]
    fn test_take_unknown_is_none() {
        let mut registry = SubPipelineRegistry::new();
        assert_eq!(registry.take("never"), None);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = SubPipelineRegistry::new();
        registry.append("zeta", Stage::Limit(1));
        registry.append("alpha", Stage::Limit(1));

        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }
}
