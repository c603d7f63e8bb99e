//! In-memory entity schema descriptions.

use super::{Relation, RelationResolver};
use crate::errors::{AggflowError, ResolverError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A declared reference from one field to another collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDeclaration {
    /// Storage name of the referenced collection.
    pub collection: String,
    /// Field matched on the referenced side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_field: Option<String>,
}

/// Relation declarations for one entity type.
///
/// ```json
/// { "entity": "posts", "relations": { "author": { "collection": "users" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRelations {
    /// The entity these declarations describe.
    pub entity: String,
    /// Field name to declaration.
    #[serde(default)]
    pub relations: HashMap<String, RelationDeclaration>,
}

impl SchemaRelations {
    /// Creates an entity description without relations.
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            relations: HashMap::new(),
        }
    }

    /// Parses a description from JSON.
    ///
    /// # Errors
    ///
    /// Returns `AggflowError::Config` if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, AggflowError> {
        serde_json::from_str(json).map_err(|e| AggflowError::Config(e.to_string()))
    }

    /// Declares that `field` references `collection`.
    #[must_use]
    pub fn with_reference(mut self, field: impl Into<String>, collection: impl Into<String>) -> Self {
        self.relations.insert(
            field.into(),
            RelationDeclaration {
                collection: collection.into(),
                foreign_field: None,
            },
        );
        self
    }

    /// Declares a reference matched on a specific foreign field.
    #[must_use]
    pub fn with_reference_on(
        mut self,
        field: impl Into<String>,
        collection: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> Self {
        self.relations.insert(
            field.into(),
            RelationDeclaration {
                collection: collection.into(),
                foreign_field: Some(foreign_field.into()),
            },
        );
        self
    }

    /// Looks up `field` synchronously.
    #[must_use]
    pub fn relation_of(&self, field: &str) -> Relation {
        self.relations
            .get(field)
            .map_or(Relation::Unrelated, |decl| Relation::Reference {
                collection: decl.collection.clone(),
                foreign_field: decl.foreign_field.clone(),
            })
    }
}

#[async_trait]
impl RelationResolver for SchemaRelations {
    async fn resolve(&self, field: &str) -> Result<Relation, ResolverError> {
        Ok(self.relation_of(field))
    }
}
