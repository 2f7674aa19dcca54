//! Configuration for path resolution and record remapping

use std::collections::BTreeMap;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{MappingError, MappingResult};
use super::tree::{OpaqueTypeSet, ValueKind};
use super::types::FieldMap;

/// Everything needed to build a [`RecordMapper`](super::RecordMapper)
///
/// Loaded once at startup and treated as read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Value kinds treated as leaves
    #[serde(default)]
    pub opaque_types: OpaqueTypeSet,
    /// What to do when a mapped name occurs more than once in a schema
    #[serde(default)]
    pub ambiguity: AmbiguityPolicy,
    /// What a batch run does with a record that fails to remap
    #[serde(default)]
    pub on_error: OnError,
    /// Source schema tree; leaf values are placeholders
    pub source_schema: Value,
    /// Destination schema tree, used as the skeleton of every output record
    pub destination_schema: Value,
    /// Source field name -> destination field name
    pub field_map: FieldMap,
    /// Candidate values per kind for synthetic records
    #[serde(default)]
    pub samples: BTreeMap<ValueKind, Vec<Value>>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            opaque_types: OpaqueTypeSet::default(),
            ambiguity: AmbiguityPolicy::default(),
            on_error: OnError::default(),
            source_schema: Value::Object(serde_json::Map::new()),
            destination_schema: Value::Object(serde_json::Map::new()),
            field_map: FieldMap::new(),
            samples: BTreeMap::new(),
        }
    }
}

impl MappingConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<FsPath>) -> MappingResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| MappingError::ConfigReadError {
                path: path.to_path_buf(),
                source,
            })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn from_json_str(content: &str) -> MappingResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> MappingResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the parts of the config that serde cannot
    pub fn validate(&self) -> MappingResult<()> {
        if !self.source_schema.is_object() {
            return Err(MappingError::InvalidConfig(
                "source_schema must be an object".to_string(),
            ));
        }
        if !self.destination_schema.is_object() {
            return Err(MappingError::InvalidConfig(
                "destination_schema must be an object".to_string(),
            ));
        }
        if self.field_map.is_empty() {
            return Err(MappingError::InvalidConfig(
                "field_map must have at least one entry".to_string(),
            ));
        }
        for (kind, pool) in &self.samples {
            if let Some(bad) = pool.iter().find(|v| !fits_pool(*kind, v)) {
                return Err(MappingError::InvalidConfig(format!(
                    "sample {} is not of kind '{}'",
                    bad, kind
                )));
            }
        }
        Ok(())
    }

    pub fn with_source_schema(mut self, schema: Value) -> Self {
        self.source_schema = schema;
        self
    }

    pub fn with_destination_schema(mut self, schema: Value) -> Self {
        self.destination_schema = schema;
        self
    }

    /// Append one field-map entry
    pub fn with_field(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.field_map.insert(source.into(), destination.into());
        self
    }

    pub fn with_opaque_types(mut self, opaque_types: OpaqueTypeSet) -> Self {
        self.opaque_types = opaque_types;
        self
    }

    pub fn with_ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Set the sample pool for one kind
    pub fn with_samples(mut self, kind: ValueKind, samples: Vec<Value>) -> Self {
        self.samples.insert(kind, samples);
        self
    }
}

/// Whole numbers are valid samples for a `number` pool
fn fits_pool(kind: ValueKind, value: &Value) -> bool {
    match (kind, ValueKind::of(value)) {
        (ValueKind::Number, ValueKind::Integer) => true,
        (expected, actual) => expected == actual,
    }
}

/// Handling of field names that occur at more than one depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguityPolicy {
    /// Take the first depth-first match without checking for others
    Ignore,
    /// Take the first match and log every occurrence
    #[default]
    Warn,
    /// Fail path map construction
    Reject,
}

impl std::fmt::Display for AmbiguityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmbiguityPolicy::Ignore => write!(f, "ignore"),
            AmbiguityPolicy::Warn => write!(f, "warn"),
            AmbiguityPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for AmbiguityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(AmbiguityPolicy::Ignore),
            "warn" => Ok(AmbiguityPolicy::Warn),
            "reject" | "strict" => Ok(AmbiguityPolicy::Reject),
            _ => Err(format!("Unknown ambiguity policy: {}", s)),
        }
    }
}

/// What a batch run does with a record that fails to remap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Stop the run at the first failing record
    #[default]
    Abort,
    /// Log the failure, drop the record and continue
    Skip,
}

impl std::fmt::Display for OnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnError::Abort => write!(f, "abort"),
            OnError::Skip => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(OnError::Abort),
            "skip" => Ok(OnError::Skip),
            _ => Err(format!("Unknown error handling mode: {}", s)),
        }
    }
}
