//! Domain types shared across the pipeline.
//!
//! Database rows are converted into these types at the repository boundary and upstream JSON is
//! parsed into them at the fetch boundary, so services never handle raw rows or untyped JSON.

pub mod campaign;
pub mod killmail;
pub mod pipeline;
