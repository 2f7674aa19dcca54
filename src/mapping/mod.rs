//! Field path resolution and record remapping between nested schemas
//!
//! This module provides functionality to:
//! - Model records and schemas as trees of containers and opaque leaves
//! - Resolve the path to a named field inside a schema tree
//! - Build a path map from a source/destination field-name map
//! - Copy values from source records into fresh destination records
//!
//! # Example
//!
//! ```rust
//! use schema_remap::mapping::{MappingConfig, RecordMapper};
//! use serde_json::json;
//!
//! let config = MappingConfig::new()
//!     .with_source_schema(json!({"f1": {"f2": 3, "f3": "s"}, "f4": [1, 2, 3]}))
//!     .with_destination_schema(json!({"field2": null, "field4": null}))
//!     .with_field("f2", "field2")
//!     .with_field("f4", "field4");
//!
//! let mapper = RecordMapper::new(&config)?;
//! let out = mapper.remap_json(json!({"f1": {"f2": 7, "f3": "x"}, "f4": [9, 9, 9]}))?;
//! assert_eq!(out, json!({"field2": 7, "field4": [9, 9, 9]}));
//! # Ok::<(), schema_remap::mapping::MappingError>(())
//! ```

mod config;
mod error;
mod mapper;
mod mover;
mod resolver;
mod tree;
mod types;

pub use config::{AmbiguityPolicy, MappingConfig, OnError};
pub use error::{MappingError, MappingResult, SchemaSide};
pub use mapper::{RecordMapper, RemapReport};
pub use mover::{read_at_path, remap, remap_records, write_at_path};
pub use resolver::{find_occurrences, generate_path_map, generate_path_map_with_policy, resolve};
pub use tree::{FieldValue, OpaqueTypeSet, OpaqueValue, ValueKind};
pub use types::{FieldMap, Path, PathMap, PathMapEntry};

/// Remap JSON records with a one-off mapper built from `config`
///
/// Convenience for callers that do not need to keep the mapper around.
pub fn remap_json_records(
    config: &MappingConfig,
    records: impl IntoIterator<Item = serde_json::Value>,
) -> MappingResult<Vec<serde_json::Value>> {
    let mapper = RecordMapper::new(config)?;
    let (output, _report) = mapper.remap_batch(records)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remap_json_records() {
        let config = MappingConfig::new()
            .with_source_schema(json!({"user": {"name": "n", "email": "e"}}))
            .with_destination_schema(json!({"contact": {"email": null}, "name": null}))
            .with_field("name", "name")
            .with_field("email", "email");

        let out = remap_json_records(
            &config,
            vec![
                json!({"user": {"name": "Ada", "email": "ada@example.com"}}),
                json!({"user": {"name": "Bob", "email": "bob@example.com"}}),
            ],
        )
        .unwrap();

        assert_eq!(
            out,
            vec![
                json!({"contact": {"email": "ada@example.com"}, "name": "Ada"}),
                json!({"contact": {"email": "bob@example.com"}, "name": "Bob"}),
            ]
        );
    }

    #[test]
    fn test_remap_json_records_propagates_field_not_found() {
        let config = MappingConfig::new()
            .with_source_schema(json!({"a": 1}))
            .with_destination_schema(json!({"b": null}))
            .with_field("missing", "b");

        let err = remap_json_records(&config, vec![json!({"a": 2})]).unwrap_err();
        assert!(matches!(err, MappingError::FieldNotFound { .. }));
    }
}
