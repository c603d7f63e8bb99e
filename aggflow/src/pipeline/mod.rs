//! Pipeline assembly.
//!
//! This module provides:
//! - The fluent aggregation builder
//! - Routing targets for stages

mod builder;
mod target;

pub use builder::AggregationBuilder;
pub use target::Target;
