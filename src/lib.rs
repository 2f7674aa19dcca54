//! Schema Remap - move data between independently shaped nested records
//!
//! Provides:
//! - A tagged tree model for nested records and their schemas
//! - Field path resolution (depth-first, opaque leaves never entered)
//! - Path-map construction from a source -> destination field-name map
//! - Record remapping along resolved paths
//! - Synthetic record generation for trying a mapping out

pub mod generate;
pub mod mapping;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use generate::{GenerateError, RecordGenerator, SamplePools};
pub use mapping::{
    AmbiguityPolicy, FieldMap, FieldValue, MappingConfig, MappingError, MappingResult, OnError,
    OpaqueTypeSet, Path, PathMap, RecordMapper, RemapReport, ValueKind,
};
