//! Stage factory.
//!
//! Every function here is a pure constructor: the same arguments always
//! yield the same stage, and nothing is validated beyond the types.
//! Malformed content is left for the aggregation engine to reject.

mod factory;

pub use factory::{
    add_fields, conditional_match, equality_match, facet, greater_than, group, less_than, limit,
    lookup, project, range_match, skip, sort, switch_match, unwind,
};
