//! Testing utilities for aggflow builders.
//!
//! This module provides:
//! - A fixture schema with a mix of related and plain fields
//! - Resolvers with artificial latency or failures

mod fixtures;

pub use fixtures::{blog_schema, DelayedRelationResolver, FailingRelationResolver};
