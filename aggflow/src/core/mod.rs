//! Core domain model types for aggflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - The closed `Stage` enum and its typed payloads
//! - Stage kinds and their wire operators
//! - Attachment names shared between joins and unwinds

mod attachment;
mod filter;
mod kind;
mod stage;

pub use attachment::Attachment;
pub use filter::{ConditionalMatch, MatchFilter, RangeOperator, SwitchCase, SwitchField};
pub use kind::StageKind;
pub use stage::{
    AddFieldsSpec, Document, FacetSpec, LookupSpec, SortDirection, SortSpec, Stage, UnwindOptions,
    UnwindSpec,
};
