//! Remap command implementation

use std::path::PathBuf;

use crate::cli::commands::{load_config, load_input, parse_records, write_output};
use crate::cli::error::CliError;
use crate::cli::output::{format_report, render_records};
use crate::mapping::{OnError, RecordMapper};

/// Arguments for the `remap` command
pub struct RemapArgs {
    /// Mapping configuration file
    pub config: PathBuf,
    /// Source records file, or `-` for stdin
    pub input: String,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    /// Overrides the configured error handling
    pub on_error: Option<OnError>,
}

/// Handle the `remap` command
pub fn handle_remap(args: &RemapArgs) -> Result<(), CliError> {
    let mut config = load_config(&args.config)?;
    if let Some(on_error) = args.on_error {
        config = config.with_on_error(on_error);
    }

    let mapper = RecordMapper::new(&config)?;
    let records = parse_records(&load_input(&args.input)?)?;
    let (output, report) = mapper.remap_batch(records)?;

    write_output(args.output.as_deref(), &render_records(&output)?)?;
    eprintln!("{}", format_report(&report));
    Ok(())
}
