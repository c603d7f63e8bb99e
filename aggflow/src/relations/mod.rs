//! Relation resolution for joins.
//!
//! A resolver answers one question about the entity being aggregated: does
//! this field reference another collection, and if so which one? The join
//! operation is its only consumer.

mod schema;

pub use schema::{RelationDeclaration, SchemaRelations};

use crate::errors::ResolverError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The answer a resolver gives for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Relation {
    /// The field is a plain value.
    Unrelated,
    /// The field references documents in another collection.
    Reference {
        /// Storage name of the referenced collection.
        collection: String,
        /// Field matched on the referenced side; the builder default applies when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        foreign_field: Option<String>,
    },
}

impl Relation {
    /// Creates a reference to `collection` using the default foreign field.
    #[must_use]
    pub fn reference(collection: impl Into<String>) -> Self {
        Self::Reference {
            collection: collection.into(),
            foreign_field: None,
        }
    }

    /// Returns true if the field references another collection.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }
}

/// Read-only source of relation declarations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationResolver: Send + Sync {
    /// Resolves `field`.
    ///
    /// Fields without a declared relation must yield `Relation::Unrelated`,
    /// never an error. Errors are reserved for a failing schema source.
    async fn resolve(&self, field: &str) -> Result<Relation, ResolverError>;
}

/// A resolver that declares no relations at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelations;

#[async_trait]
impl RelationResolver for NoRelations {
    async fn resolve(&self, _field: &str) -> Result<Relation, ResolverError> {
        Ok(Relation::Unrelated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_relations() {
        let relation = tokio_test::block_on(NoRelations.resolve("author")).unwrap();
        assert_eq!(relation, Relation::Unrelated);
    }

    #[test]
    fn test_relation_serialization() {
        let json = serde_json::to_value(Relation::reference("users")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "reference", "collection": "users"}));

        let parsed: Relation = serde_json::from_str(r#"{"type": "unrelated"}"#).unwrap();
        assert!(!parsed.is_reference());
    }

    #[tokio::test]
    async fn test_mock_resolver() {
        let mut resolver = MockRelationResolver::new();
        resolver
            .expect_resolve()
            .withf(|field| field == "author")
            .times(1)
            .returning(|_| Ok(Relation::reference("users")));

        let relation = resolver.resolve("author").await.unwrap();
        assert!(relation.is_reference());
    }
}
