//! Core traits, data structures, and abstractions for dataset preparation
//!
//! This crate provides the foundational components of the dataprep backend:
//! the in-memory table model, the contract every operation implements, the
//! per-family operation registries with explicit plugin loading, and the
//! sequential pipeline executor that threads a table through an ordered list
//! of operations.

#![warn(missing_docs)]

pub mod column;
pub mod error;
pub mod operation;
pub mod pipeline;
pub mod plugin;
pub mod registry;
pub mod store;
pub mod table;
pub mod value;

// Re-export key types for convenience
pub use column::Column;
pub use error::{Error, Result};
pub use operation::{OpOutput, OpSpec, Operation, Params};
pub use pipeline::{Executor, OpDescriptor, PipelineFailure, PipelineOutcome};
pub use registry::{Family, OpInfo, Provenance, Registration, Registry};
pub use store::{DatasetStore, MemoryStore};
pub use table::Table;
pub use value::{DataType, Value};
