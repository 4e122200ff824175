//! Data types for taskq.
//!
//! Projects and the enumerated task attributes the query language validates
//! against.

mod project;
mod task;

pub use project::*;
pub use task::*;
