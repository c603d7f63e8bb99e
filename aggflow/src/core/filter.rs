//! Filter and branch payloads: `$match` bodies and `$switch` cases.

use super::Stage;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Comparison operators accepted by a range match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeOperator {
    /// `$gt`
    #[serde(rename = "$gt")]
    GreaterThan,
    /// `$gte`
    #[serde(rename = "$gte")]
    GreaterOrEqual,
    /// `$lt`
    #[serde(rename = "$lt")]
    LessThan,
    /// `$lte`
    #[serde(rename = "$lte")]
    LessOrEqual,
}

impl RangeOperator {
    /// Returns the wire operator key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GreaterThan => "$gt",
            Self::GreaterOrEqual => "$gte",
            Self::LessThan => "$lt",
            Self::LessOrEqual => "$lte",
        }
    }
}

impl fmt::Display for RangeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Branches of a conditional match, each a consumed sub-pipeline.
///
/// Evaluated by the engine at query time, never by the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalMatch {
    /// Stages whose conjunction forms the condition.
    pub condition: Vec<Stage>,
    /// Stages used when the condition holds.
    pub then: Vec<Stage>,
    /// Stages used when it does not.
    pub otherwise: Vec<Stage>,
}

#[derive(Serialize)]
struct Conjunction<'a> {
    #[serde(rename = "$and")]
    and: &'a [Stage],
}

#[derive(Serialize)]
struct CondBranches<'a> {
    #[serde(rename = "if")]
    condition: Conjunction<'a>,
    then: Conjunction<'a>,
    #[serde(rename = "else")]
    otherwise: Conjunction<'a>,
}

#[derive(Serialize)]
struct Cond<'a> {
    #[serde(rename = "$cond")]
    cond: CondBranches<'a>,
}

impl Serialize for ConditionalMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cond = Cond {
            cond: CondBranches {
                condition: Conjunction { and: &self.condition },
                then: Conjunction { and: &self.then },
                otherwise: Conjunction { and: &self.otherwise },
            },
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$expr", &cond)?;
        map.end()
    }
}

/// Body of a `$match` stage.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchFilter {
    /// `{ field: value }`
    Equality {
        /// Field name.
        field: String,
        /// Value the field must equal.
        value: Value,
    },
    /// `{ field: { <op>: value } }`
    Range {
        /// Field name.
        field: String,
        /// Comparison operator.
        operator: RangeOperator,
        /// Bound to compare against.
        value: Value,
    },
    /// `{ $expr: { $cond: ... } }`
    Conditional(Box<ConditionalMatch>),
}

impl Serialize for MatchFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Equality { field, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(field, value)?;
                map.end()
            }
            Self::Range { field, operator, value } => {
                let mut bound = serde_json::Map::with_capacity(1);
                bound.insert(operator.as_str().to_string(), value.clone());
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(field, &bound)?;
                map.end()
            }
            Self::Conditional(branches) => branches.serialize(serializer),
        }
    }
}

/// One `(case, then)` pair of a `$switch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    /// Expression evaluated by the engine.
    pub case: Value,
    /// Value produced when `case` is the first to hold.
    pub then: Value,
}

impl SwitchCase {
    /// Creates a new case.
    #[must_use]
    pub fn new(case: impl Into<Value>, then: impl Into<Value>) -> Self {
        Self {
            case: case.into(),
            then: then.into(),
        }
    }
}

impl<C: Into<Value>, T: Into<Value>> From<(C, T)> for SwitchCase {
    fn from((case, then): (C, T)) -> Self {
        Self::new(case, then)
    }
}

/// A field computed by first-match-wins evaluation over ordered cases.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchField {
    /// Field receiving the computed value.
    pub field: String,
    /// Cases in evaluation order.
    pub branches: Vec<SwitchCase>,
    /// Value used when no case holds.
    pub default: Value,
}

#[derive(Serialize)]
struct SwitchBody<'a> {
    branches: &'a [SwitchCase],
    default: &'a Value,
}

#[derive(Serialize)]
struct SwitchExpr<'a> {
    #[serde(rename = "$switch")]
    switch: SwitchBody<'a>,
}

impl Serialize for SwitchField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let expr = SwitchExpr {
            switch: SwitchBody {
                branches: &self.branches,
                default: &self.default,
            },
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &expr)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_equality_shape() {
        let filter = MatchFilter::Equality {
            field: "city".to_string(),
            value: json!("New York"),
        };
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({"city": "New York"}));
    }

    #[test]
    fn test_range_shape() {
        let filter = MatchFilter::Range {
            field: "age".to_string(),
            operator: RangeOperator::GreaterOrEqual,
            value: json!(30),
        };
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({"age": {"$gte": 30}}));
    }

    #[test]
    fn test_switch_preserves_case_order() {
        let field = SwitchField {
            field: "tier".to_string(),
            branches: vec![
                SwitchCase::new(json!({"$gte": ["$score", 90]}), "gold"),
                SwitchCase::new(json!({"$gte": ["$score", 50]}), "silver"),
            ],
            default: Value::Null,
        };

        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({
                "tier": {
                    "$switch": {
                        "branches": [
                            {"case": {"$gte": ["$score", 90]}, "then": "gold"},
                            {"case": {"$gte": ["$score", 50]}, "then": "silver"}
                        ],
                        "default": null
                    }
                }
            })
        );
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(RangeOperator::LessThan.to_string(), "$lt");
        assert_eq!(RangeOperator::GreaterThan.as_str(), "$gt");
    }
}
