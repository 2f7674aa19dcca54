//! Error type for CLI commands

use std::path::PathBuf;

use thiserror::Error;

use crate::generate::GenerateError;
use crate::mapping::MappingError;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Bad command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Input file could not be read
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    /// Output file could not be written
    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    /// Input records are not valid JSON
    #[error("Failed to parse records: {0}")]
    RecordParseError(String),

    /// Mapping construction or remapping failed
    #[error("Mapping failed: {0}")]
    MappingError(#[from] MappingError),

    /// Synthetic generation failed
    #[error("Generation failed: {0}")]
    GenerateError(#[from] GenerateError),

    /// Output serialization failed
    #[error("Failed to serialize output: {0}")]
    SerializeError(#[from] serde_json::Error),
}
