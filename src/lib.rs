// StateStats: per-state topic emphasis rankings over a fixed vocabulary.
//
// This is the library root. Each module corresponds to one part of the
// counting -> ranking -> grouping pipeline or to the plumbing around it.

pub mod config;
pub mod corpus;
pub mod errors;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod vocabulary;
