//! Paths command implementation

use std::path::PathBuf;

use crate::cli::commands::load_config;
use crate::cli::error::CliError;
use crate::cli::output::format_path_map;
use crate::mapping::{AmbiguityPolicy, RecordMapper};

/// Arguments for the `paths` command
pub struct PathsArgs {
    /// Mapping configuration file
    pub config: PathBuf,
    /// Overrides the configured ambiguity policy
    pub ambiguity: Option<AmbiguityPolicy>,
}

/// Handle the `paths` command: resolve and print the path map
pub fn handle_paths(args: &PathsArgs) -> Result<(), CliError> {
    let mut config = load_config(&args.config)?;
    if let Some(policy) = args.ambiguity {
        config = config.with_ambiguity(policy);
    }

    let mapper = RecordMapper::new(&config)?;
    print!("{}", format_path_map(mapper.path_map()));
    Ok(())
}
