//! Error types for synthetic record generation

use thiserror::Error;

use crate::mapping::{Path, ValueKind};

/// Errors that can occur while generating records
#[derive(Error, Debug, Clone)]
pub enum GenerateError {
    /// A schema leaf has a kind with no candidate values
    #[error("No sample values for kind '{kind}' (needed at '{path}')")]
    EmptyPool { kind: ValueKind, path: Path },

    /// Schema root is a leaf, so there is no record shape to fill
    #[error("Schema root must be a container, found {0}")]
    InvalidSchema(ValueKind),
}

/// Result type for generation
pub type GenerateResult<T> = Result<T, GenerateError>;
