//! Generate command implementation

use std::path::PathBuf;

use serde_json::Value;

use crate::cli::commands::{load_config, write_output};
use crate::cli::error::CliError;
use crate::cli::output::{format_report, format_sample, render_records};
use crate::generate::{RecordGenerator, SamplePools};
use crate::mapping::{FieldValue, RecordMapper};

/// Arguments for the `generate` command
pub struct GenerateArgs {
    /// Mapping configuration file
    pub config: PathBuf,
    /// Number of records to generate
    pub count: usize,
    /// Seed for reproducible output
    pub seed: Option<u64>,
    /// Remap the generated records instead of emitting them as-is
    pub remap: bool,
    /// Print the first record, the field map and its remapped form
    pub sample: bool,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
}

/// Handle the `generate` command
pub fn handle_generate(args: &GenerateArgs) -> Result<(), CliError> {
    if args.count == 0 {
        return Err(CliError::InvalidArgument(
            "--count must be at least 1".to_string(),
        ));
    }

    let config = load_config(&args.config)?;
    let mapper = RecordMapper::new(&config)?;

    let pools = SamplePools::with_overrides(&config.samples);
    let mut generator = match args.seed {
        Some(seed) => RecordGenerator::with_seed(pools, seed),
        None => RecordGenerator::new(pools),
    };
    let records = generator.generate_many(mapper.source_schema(), args.count)?;

    if args.sample {
        let first = &records[0];
        let remapped = mapper.remap(first)?;
        eprint!(
            "{}",
            format_sample(&first.to_json(), &config.field_map, &remapped.to_json())?
        );
    }

    let output: Vec<Value> = if args.remap {
        let (output, report) = mapper.remap_batch(records.into_iter().map(FieldValue::into_json))?;
        eprintln!("{}", format_report(&report));
        output
    } else {
        records.into_iter().map(FieldValue::into_json).collect()
    };

    write_output(args.output.as_deref(), &render_records(&output)?)
}
