//! Named sub-pipeline storage.

mod names;
mod registry;

pub use names::NameGenerator;
pub use registry::SubPipelineRegistry;
