//! CLI module for the schema-remap binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
