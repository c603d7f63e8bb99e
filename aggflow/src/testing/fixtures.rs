//! Resolvers and schemas for tests.

use crate::errors::ResolverError;
use crate::relations::{Relation, RelationResolver, SchemaRelations};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// A `posts` entity whose `author` and `category` fields reference other
/// collections; `title` and `tags` are plain.
#[must_use]
pub fn blog_schema() -> SchemaRelations {
    SchemaRelations::new("posts")
        .with_reference("author", "users")
        .with_reference("category", "categories")
}

/// Wraps a schema and delays each field's answer.
///
/// Useful to make lookups finish in a different order than they started.
#[derive(Debug, Clone)]
pub struct DelayedRelationResolver {
    schema: SchemaRelations,
    delays: HashMap<String, Duration>,
}

impl DelayedRelationResolver {
    /// Creates a resolver with no delays.
    #[must_use]
    pub fn new(schema: SchemaRelations) -> Self {
        Self {
            schema,
            delays: HashMap::new(),
        }
    }

    /// Delays the answer for `field`.
    #[must_use]
    pub fn with_delay(mut self, field: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(field.into(), delay);
        self
    }
}

#[async_trait]
impl RelationResolver for DelayedRelationResolver {
    async fn resolve(&self, field: &str) -> Result<Relation, ResolverError> {
        if let Some(delay) = self.delays.get(field) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self.schema.relation_of(field))
    }
}

/// Fails for one field and defers to a schema for the rest.
#[derive(Debug, Clone)]
pub struct FailingRelationResolver {
    schema: SchemaRelations,
    failing_field: String,
}

impl FailingRelationResolver {
    /// Creates a resolver that fails when asked about `failing_field`.
    #[must_use]
    pub fn new(schema: SchemaRelations, failing_field: impl Into<String>) -> Self {
        Self {
            schema,
            failing_field: failing_field.into(),
        }
    }
}

#[async_trait]
impl RelationResolver for FailingRelationResolver {
    async fn resolve(&self, field: &str) -> Result<Relation, ResolverError> {
        if field == self.failing_field {
            return Err(ResolverError::new(field, "schema source unavailable"));
        }
        Ok(self.schema.relation_of(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_schema() {
        let schema = blog_schema();
        assert!(schema.relation_of("author").is_reference());
        assert!(!schema.relation_of("title").is_reference());
    }

    #[tokio::test]
    async fn test_failing_resolver() {
        let resolver = FailingRelationResolver::new(blog_schema(), "author");
        assert!(resolver.resolve("author").await.is_err());
        assert!(resolver.resolve("category").await.unwrap().is_reference());
    }
}
