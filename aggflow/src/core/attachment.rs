//! Typed names for joined-document attachments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The field a `$lookup` stage writes its joined documents into.
///
/// `join` hands these back to the caller so that `unwind` can refer to the
/// exact same field instead of re-deriving the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attachment(String);

impl Attachment {
    /// Creates an attachment with an explicit field name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derives the attachment for a joined field: `<field><suffix>`.
    #[must_use]
    pub fn for_field(field: &str, suffix: &str) -> Self {
        Self(format!("{field}{suffix}"))
    }

    /// Returns the attachment field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns the field path expression (`$<name>`) used by `$unwind`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("${}", self.0)
    }
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Attachment {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Attachment {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_field() {
        let attachment = Attachment::for_field("author", "Details");
        assert_eq!(attachment.name(), "authorDetails");
        assert_eq!(attachment.path(), "$authorDetails");
    }

    #[test]
    fn test_explicit_name() {
        let attachment = Attachment::from("owner");
        assert_eq!(attachment.to_string(), "owner");
        assert_eq!(attachment.path(), "$owner");
    }
}
