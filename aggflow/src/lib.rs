//! # Aggflow
//!
//! A fluent builder for document-store aggregation pipelines.
//!
//! Aggflow assembles an ordered list of stages (filter, join, group, sort,
//! paginate, branch) for submission to an aggregation engine, with support for:
//!
//! - **Typed stages**: a closed `Stage` enum rendered to the engine's wire shape
//! - **Named sub-pipelines**: stage lists built on the side and spliced in later
//! - **Query-time branching**: conditional matches consuming sub-pipelines as branches
//! - **Schema-driven joins**: `$lookup` stages derived from declared relations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aggflow::prelude::*;
//!
//! let mut builder = AggregationBuilder::new(Arc::new(schema));
//! builder
//!     .equality_match("age", json!({"$gte": 30}), "adults")
//!     .equality_match("city", "New York", "nyc")
//!     .equality_match("city", "Boston", "boston")
//!     .conditional_match("adults", "nyc", "boston", Target::Main)?;
//! let attachments = builder.join(["author"], Target::Main).await?;
//! builder.unwind_attachments(&attachments, UnwindOptions::default(), Target::Main);
//!
//! let pipeline = builder.build_documents()?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod relations;
pub mod stages;
pub mod subpipeline;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{BranchReuse, BuilderConfig};
    pub use crate::core::{
        Attachment, Document, FacetSpec, RangeOperator, SortDirection, SortSpec, Stage,
        StageKind, SwitchCase, UnwindOptions,
    };
    pub use crate::errors::{
        AggflowError, DuplicateReferenceError, MissingSubPipelineError, ResolverError,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{AggregationBuilder, Target};
    pub use crate::relations::{NoRelations, Relation, RelationResolver, SchemaRelations};
}
