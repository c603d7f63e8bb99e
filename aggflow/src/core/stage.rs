//! The `Stage` type and its typed payloads.

use super::{Attachment, MatchFilter, StageKind, SwitchField};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON object passed through verbatim (group keys, projections, ...).
pub type Document = serde_json::Map<String, Value>;

/// One aggregation pipeline stage.
///
/// Serializes to the single-key document the aggregation engine expects,
/// e.g. `{"$limit": 10}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stage {
    /// `$match`
    #[serde(rename = "$match")]
    Match(MatchFilter),
    /// `$lookup`
    #[serde(rename = "$lookup")]
    Lookup(LookupSpec),
    /// `$unwind`
    #[serde(rename = "$unwind")]
    Unwind(UnwindSpec),
    /// `$group`
    #[serde(rename = "$group")]
    Group(Document),
    /// `$project`
    #[serde(rename = "$project")]
    Project(Document),
    /// `$sort`
    #[serde(rename = "$sort")]
    Sort(SortSpec),
    /// `$skip`
    #[serde(rename = "$skip")]
    Skip(u64),
    /// `$limit`
    #[serde(rename = "$limit")]
    Limit(u64),
    /// `$facet`
    #[serde(rename = "$facet")]
    Facet(FacetSpec),
    /// `$addFields`
    #[serde(rename = "$addFields")]
    AddFields(AddFieldsSpec),
}

impl Stage {
    /// Returns the kind of this stage.
    #[must_use]
    pub const fn kind(&self) -> StageKind {
        match self {
            Self::Match(_) => StageKind::Match,
            Self::Lookup(_) => StageKind::Lookup,
            Self::Unwind(_) => StageKind::Unwind,
            Self::Group(_) => StageKind::Group,
            Self::Project(_) => StageKind::Project,
            Self::Sort(_) => StageKind::Sort,
            Self::Skip(_) => StageKind::Skip,
            Self::Limit(_) => StageKind::Limit,
            Self::Facet(_) => StageKind::Facet,
            Self::AddFields(_) => StageKind::AddFields,
        }
    }

    /// Renders the stage into its wire document.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload value cannot be represented as JSON.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Body of a `$lookup` stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupSpec {
    /// Collection joined against.
    pub from: String,
    /// Field on the input documents.
    pub local_field: String,
    /// Field on the joined collection.
    pub foreign_field: String,
    /// Field receiving the joined documents.
    #[serde(rename = "as")]
    pub attachment: Attachment,
}

/// Options for an `$unwind` stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnwindOptions {
    /// Keep documents whose array is missing, null or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_null_and_empty_arrays: Option<bool>,
}

impl UnwindOptions {
    /// Creates options that keep documents without joined values.
    #[must_use]
    pub const fn preserving_empty() -> Self {
        Self {
            preserve_null_and_empty_arrays: Some(true),
        }
    }
}

/// Body of an `$unwind` stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwindSpec {
    /// The attachment whose array is deconstructed.
    pub attachment: Attachment,
    /// Extra options; without any the short string form is emitted.
    pub options: UnwindOptions,
}

impl Serialize for UnwindSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.options.preserve_null_and_empty_arrays {
            None => serializer.serialize_str(&self.attachment.path()),
            Some(preserve) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("path", &self.attachment.path())?;
                map.serialize_entry("preserveNullAndEmptyArrays", &preserve)?;
                map.end()
            }
        }
    }
}

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// `1`
    Ascending,
    /// `-1`
    Descending,
}

impl SortDirection {
    /// Returns the numeric wire value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl Serialize for SortDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_i32())
    }
}

/// Ordered sort keys for a `$sort` stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<(String, SortDirection)>,
}

impl SortSpec {
    /// Creates an empty sort specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ascending key.
    #[must_use]
    pub fn asc(self, field: impl Into<String>) -> Self {
        self.by(field, SortDirection::Ascending)
    }

    /// Adds a descending key.
    #[must_use]
    pub fn desc(self, field: impl Into<String>) -> Self {
        self.by(field, SortDirection::Descending)
    }

    /// Adds a key with an explicit direction.
    #[must_use]
    pub fn by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.keys.push((field.into(), direction));
        self
    }

    /// Returns the keys in declared order.
    #[must_use]
    pub fn keys(&self) -> &[(String, SortDirection)] {
        &self.keys
    }
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (field, direction) in &self.keys {
            map.serialize_entry(field, direction)?;
        }
        map.end()
    }
}

/// Named branches of a `$facet` stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetSpec {
    branches: Vec<(String, Vec<Stage>)>,
}

impl FacetSpec {
    /// Creates an empty facet specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a branch. Any stage list works, including a retrieved sub-pipeline.
    #[must_use]
    pub fn with_branch(mut self, name: impl Into<String>, stages: Vec<Stage>) -> Self {
        self.branches.push((name.into(), stages));
        self
    }

    /// Returns the branches in declared order.
    #[must_use]
    pub fn branches(&self) -> &[(String, Vec<Stage>)] {
        &self.branches
    }
}

impl Serialize for FacetSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.branches.len()))?;
        for (name, stages) in &self.branches {
            map.serialize_entry(name, stages)?;
        }
        map.end()
    }
}

/// Body of an `$addFields` stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AddFieldsSpec {
    /// A single field computed by a `$switch`.
    Switch(SwitchField),
    /// Arbitrary computed fields, passed through verbatim.
    Fields(Document),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_limit_and_skip_shapes() {
        assert_eq!(Stage::Limit(10).to_document().unwrap(), json!({"$limit": 10}));
        assert_eq!(Stage::Skip(5).to_document().unwrap(), json!({"$skip": 5}));
    }

    #[test]
    fn test_lookup_shape() {
        let stage = Stage::Lookup(LookupSpec {
            from: "users".to_string(),
            local_field: "author".to_string(),
            foreign_field: "_id".to_string(),
            attachment: Attachment::new("authorDetails"),
        });

        assert_eq!(
            stage.to_document().unwrap(),
            json!({
                "$lookup": {
                    "from": "users",
                    "localField": "author",
                    "foreignField": "_id",
                    "as": "authorDetails"
                }
            })
        );
    }

    #[test]
    fn test_unwind_short_and_long_forms() {
        let short = Stage::Unwind(UnwindSpec {
            attachment: Attachment::new("authorDetails"),
            options: UnwindOptions::default(),
        });
        assert_eq!(short.to_document().unwrap(), json!({"$unwind": "$authorDetails"}));

        let long = Stage::Unwind(UnwindSpec {
            attachment: Attachment::new("authorDetails"),
            options: UnwindOptions::preserving_empty(),
        });
        assert_eq!(
            long.to_document().unwrap(),
            json!({"$unwind": {"path": "$authorDetails", "preserveNullAndEmptyArrays": true}})
        );
    }

    #[test]
    fn test_sort_keeps_declared_order() {
        let stage = Stage::Sort(SortSpec::new().desc("createdAt").asc("name"));
        let rendered = serde_json::to_string(&stage).unwrap();
        assert_eq!(rendered, r#"{"$sort":{"createdAt":-1,"name":1}}"#);
    }

    #[test]
    fn test_facet_nests_stage_documents() {
        let facet = FacetSpec::new()
            .with_branch("total", vec![Stage::Limit(1)])
            .with_branch("page", vec![Stage::Skip(20), Stage::Limit(10)]);

        assert_eq!(
            Stage::Facet(facet).to_document().unwrap(),
            json!({
                "$facet": {
                    "total": [{"$limit": 1}],
                    "page": [{"$skip": 20}, {"$limit": 10}]
                }
            })
        );
    }

    #[test]
    fn test_group_passes_document_through() {
        let doc = json!({"_id": "$city", "count": {"$sum": 1}});
        let Value::Object(map) = doc.clone() else {
            unreachable!()
        };
        assert_eq!(Stage::Group(map).to_document().unwrap(), json!({"$group": doc}));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Stage::Limit(1).kind(), StageKind::Limit);
        assert_eq!(Stage::Sort(SortSpec::new()).kind(), StageKind::Sort);
    }
}
