//! Error types for path resolution and record remapping

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::tree::ValueKind;
use super::types::Path;

/// Which schema a field name was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSide {
    Source,
    Destination,
}

impl fmt::Display for SchemaSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSide::Source => write!(f, "source"),
            SchemaSide::Destination => write!(f, "destination"),
        }
    }
}

/// Errors that can occur while resolving paths or moving data
#[derive(Error, Debug)]
pub enum MappingError {
    /// A field-map entry names a field that does not exist in a schema
    #[error("Field '{field}' not found in {side} schema")]
    FieldNotFound { field: String, side: SchemaSide },

    /// A record does not have the container/key structure a path expects
    #[error("Record out of shape at '{path}' (step '{step}'): {reason}")]
    OutOfShape {
        path: Path,
        step: String,
        reason: String,
    },

    /// A field name occurs more than once and the policy rejects that
    #[error("Field '{field}' is ambiguous in {side} schema: found at {}", format_paths(.occurrences))]
    AmbiguousField {
        field: String,
        side: SchemaSide,
        occurrences: Vec<Path>,
    },

    /// A value that is neither a container nor a configured opaque kind
    #[error("Unsupported value of kind '{kind}' at '{path}': not an opaque type and not a container")]
    UnsupportedValue { path: Path, kind: ValueKind },

    /// Configuration is inconsistent
    #[error("Invalid mapping configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read configuration file
    #[error("Failed to read configuration file: {path}")]
    ConfigReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

fn format_paths(paths: &[Path]) -> String {
    paths
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
