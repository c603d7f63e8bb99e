//! Builder events for observability.
//!
//! Each builder owns its sink; there is no process-wide default.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// A stage was appended to the main sequence or a sub-pipeline.
pub const STAGE_ROUTED: &str = "stage.routed";

/// A sub-pipeline was spliced into the main sequence.
pub const SUBPIPELINE_SPLICED: &str = "subpipeline.spliced";

/// A sub-pipeline was removed by retrieval or by a conditional match.
pub const SUBPIPELINE_CONSUMED: &str = "subpipeline.consumed";

/// A conditional match failed validation. Carries the error's diagnostic info.
pub const MATCH_REJECTED: &str = "match.rejected";

/// A join skipped a field without a declared relation.
pub const JOIN_SKIPPED: &str = "join.skipped";
