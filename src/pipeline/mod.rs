// The four-stage aggregation pipeline.
//
// counter -> (dominant | signature) -> grouper, with `shuffle` providing the
// regrouping barrier between stages and `runner` tying them together.

pub mod counter;
pub mod dominant;
pub mod grouper;
pub mod runner;
pub mod shuffle;
pub mod signature;

pub use runner::{Pipeline, PipelineOutput};
pub use signature::ZeroCountPolicy;
