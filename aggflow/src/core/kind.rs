//! Stage kind enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The aggregation operation a stage performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Filters documents (`$match`).
    Match,
    /// Joins another collection (`$lookup`).
    Lookup,
    /// Deconstructs an array field (`$unwind`).
    Unwind,
    /// Groups documents (`$group`).
    Group,
    /// Reshapes documents (`$project`).
    Project,
    /// Orders documents (`$sort`).
    Sort,
    /// Skips a number of documents (`$skip`).
    Skip,
    /// Caps the number of documents (`$limit`).
    Limit,
    /// Runs several sub-pipelines over the same input (`$facet`).
    Facet,
    /// Adds computed fields (`$addFields`).
    AddFields,
}

impl StageKind {
    /// Returns the wire operator key for this kind.
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Match => "$match",
            Self::Lookup => "$lookup",
            Self::Unwind => "$unwind",
            Self::Group => "$group",
            Self::Project => "$project",
            Self::Sort => "$sort",
            Self::Skip => "$skip",
            Self::Limit => "$limit",
            Self::Facet => "$facet",
            Self::AddFields => "$addFields",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_kind_display() {
        assert_eq!(StageKind::Match.to_string(), "$match");
        assert_eq!(StageKind::AddFields.to_string(), "$addFields");
        assert_eq!(StageKind::Lookup.to_string(), "$lookup");
    }

    #[test]
    fn test_stage_kind_serialization() {
        let json = serde_json::to_string(&StageKind::AddFields).unwrap();
        assert_eq!(json, "\"add_fields\"");
    }
}
