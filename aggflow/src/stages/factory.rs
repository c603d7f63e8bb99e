//! Pure constructors turning typed arguments into stages.

use crate::core::{
    AddFieldsSpec, Attachment, ConditionalMatch, Document, FacetSpec, LookupSpec, MatchFilter,
    RangeOperator, SortSpec, Stage, SwitchCase, SwitchField, UnwindOptions, UnwindSpec,
};
use serde_json::Value;

/// `{ $match: { field: value } }`
#[must_use]
pub fn equality_match(field: impl Into<String>, value: impl Into<Value>) -> Stage {
    Stage::Match(MatchFilter::Equality {
        field: field.into(),
        value: value.into(),
    })
}

/// `{ $match: { field: { <op>: value } } }`
#[must_use]
pub fn range_match(field: impl Into<String>, operator: RangeOperator, value: impl Into<Value>) -> Stage {
    Stage::Match(MatchFilter::Range {
        field: field.into(),
        operator,
        value: value.into(),
    })
}

/// Range match with `$lt`.
#[must_use]
pub fn less_than(field: impl Into<String>, value: impl Into<Value>) -> Stage {
    range_match(field, RangeOperator::LessThan, value)
}

/// Range match with `$gt`.
#[must_use]
pub fn greater_than(field: impl Into<String>, value: impl Into<Value>) -> Stage {
    range_match(field, RangeOperator::GreaterThan, value)
}

/// Builds a match whose branches are chosen by the engine at query time.
#[must_use]
pub fn conditional_match(condition: Vec<Stage>, then: Vec<Stage>, otherwise: Vec<Stage>) -> Stage {
    Stage::Match(MatchFilter::Conditional(Box::new(ConditionalMatch {
        condition,
        then,
        otherwise,
    })))
}

/// Computes `field` from the first case that holds, else `default`.
#[must_use]
pub fn switch_match<I, C>(field: impl Into<String>, cases: I, default: Value) -> Stage
where
    I: IntoIterator<Item = C>,
    C: Into<SwitchCase>,
{
    Stage::AddFields(AddFieldsSpec::Switch(SwitchField {
        field: field.into(),
        branches: cases.into_iter().map(Into::into).collect(),
        default,
    }))
}

/// `{ $lookup: { from, localField, foreignField, as } }`
#[must_use]
pub fn lookup(
    from: impl Into<String>,
    local_field: impl Into<String>,
    foreign_field: impl Into<String>,
    attachment: Attachment,
) -> Stage {
    Stage::Lookup(LookupSpec {
        from: from.into(),
        local_field: local_field.into(),
        foreign_field: foreign_field.into(),
        attachment,
    })
}

/// `{ $unwind: "$<attachment>" }`, or the long form when options are set.
#[must_use]
pub fn unwind(attachment: Attachment, options: UnwindOptions) -> Stage {
    Stage::Unwind(UnwindSpec { attachment, options })
}

/// `{ $group: spec }`
#[must_use]
pub fn group(spec: Document) -> Stage {
    Stage::Group(spec)
}

/// `{ $project: spec }`
#[must_use]
pub fn project(spec: Document) -> Stage {
    Stage::Project(spec)
}

/// `{ $sort: spec }`
#[must_use]
pub fn sort(spec: SortSpec) -> Stage {
    Stage::Sort(spec)
}

/// `{ $skip: n }`
#[must_use]
pub fn skip(n: u64) -> Stage {
    Stage::Skip(n)
}

/// `{ $limit: n }`
#[must_use]
pub fn limit(n: u64) -> Stage {
    Stage::Limit(n)
}

/// `{ $facet: spec }`
#[must_use]
pub fn facet(spec: FacetSpec) -> Stage {
    Stage::Facet(spec)
}

/// `{ $addFields: spec }`
#[must_use]
pub fn add_fields(spec: Document) -> Stage {
    Stage::AddFields(AddFieldsSpec::Fields(spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_equality_match() {
        let stage = equality_match("city", "New York");
        assert_eq!(stage.to_document().unwrap(), json!({"$match": {"city": "New York"}}));
    }

    #[test]
    fn test_equality_match_with_operator_document() {
        let stage = equality_match("age", json!({"$gte": 30}));
        assert_eq!(stage.to_document().unwrap(), json!({"$match": {"age": {"$gte": 30}}}));
    }

    #[test]
    fn test_wrappers_delegate_to_range_match() {
        assert_eq!(less_than("age", 65), range_match("age", RangeOperator::LessThan, 65));
        assert_eq!(greater_than("age", 18), range_match("age", RangeOperator::GreaterThan, 18));
        assert_eq!(
            less_than("age", 65).to_document().unwrap(),
            json!({"$match": {"age": {"$lt": 65}}})
        );
    }

    #[test]
    fn test_conditional_match_shape() {
        let stage = conditional_match(
            vec![equality_match("age", json!({"$gte": 30}))],
            vec![equality_match("city", "New York")],
            vec![equality_match("city", "Boston")],
        );

        assert_eq!(
            stage.to_document().unwrap(),
            json!({
                "$match": {
                    "$expr": {
                        "$cond": {
                            "if": {"$and": [{"$match": {"age": {"$gte": 30}}}]},
                            "then": {"$and": [{"$match": {"city": "New York"}}]},
                            "else": {"$and": [{"$match": {"city": "Boston"}}]}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_switch_match_shape() {
        let stage = switch_match(
            "bracket",
            [
                (json!({"$lt": ["$age", 18]}), json!("minor")),
                (json!({"$lt": ["$age", 65]}), json!("adult")),
            ],
            json!("senior"),
        );

        assert_eq!(stage.kind(), StageKind::AddFields);
        assert_eq!(
            stage.to_document().unwrap(),
            json!({
                "$addFields": {
                    "bracket": {
                        "$switch": {
                            "branches": [
                                {"case": {"$lt": ["$age", 18]}, "then": "minor"},
                                {"case": {"$lt": ["$age", 65]}, "then": "adult"}
                            ],
                            "default": "senior"
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_verbatim_wrappers() {
        let spec = doc(json!({"name": 1, "_id": 0}));
        assert_eq!(project(spec.clone()), Stage::Project(spec));
        assert_eq!(limit(3), Stage::Limit(3));
        assert_eq!(skip(7), Stage::Skip(7));
        assert_eq!(
            add_fields(doc(json!({"full": {"$concat": ["$a", "$b"]}}))).to_document().unwrap(),
            json!({"$addFields": {"full": {"$concat": ["$a", "$b"]}}})
        );
    }
}
