//! CLI command implementations

pub mod generate;
pub mod paths;
pub mod remap;

use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::cli::error::CliError;
use crate::mapping::MappingConfig;

/// Load a mapping configuration from a YAML or JSON file
pub fn load_config(path: &Path) -> Result<MappingConfig, CliError> {
    Ok(MappingConfig::from_path(path)?)
}

/// Load input content from file or stdin
pub fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Parse records from a JSON array, one JSON value per line, or
/// concatenated JSON values
///
/// Top-level arrays are flattened into their elements.
pub fn parse_records(content: &str) -> Result<Vec<Value>, CliError> {
    let mut records = Vec::new();
    for value in serde_json::Deserializer::from_str(content).into_iter::<Value>() {
        match value.map_err(|e| CliError::RecordParseError(e.to_string()))? {
            Value::Array(items) => records.extend(items),
            other => records.push(other),
        }
    }
    Ok(records)
}

/// Write `content` to `path`, or stdout when no path is given
pub fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content)
            .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string())),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
