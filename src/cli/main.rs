//! schema-remap command-line entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use schema_remap::cli::commands::generate::{GenerateArgs, handle_generate};
use schema_remap::cli::commands::paths::{PathsArgs, handle_paths};
use schema_remap::cli::commands::remap::{RemapArgs, handle_remap};
use schema_remap::mapping::{AmbiguityPolicy, OnError};

#[derive(Parser)]
#[command(name = "schema-remap")]
#[command(about = "Move records between independently shaped nested schemas", long_about = None)]
#[command(version)]
struct Cli {
    /// Log resolution and remapping details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the field map and print the resulting path map
    Paths {
        /// Mapping configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Ambiguity policy: ignore, warn or reject
        #[arg(long)]
        ambiguity: Option<AmbiguityPolicy>,
    },
    /// Remap source records into the destination schema
    Remap {
        /// Mapping configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Source records (JSON array or JSON lines), or '-' for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Per-record error handling: abort or skip
        #[arg(long)]
        on_error: Option<OnError>,
    },
    /// Generate synthetic records shaped like the source schema
    Generate {
        /// Mapping configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Number of records
        #[arg(short = 'n', long, default_value_t = 100)]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the remapped records instead of the generated ones
        #[arg(long)]
        remap: bool,

        /// Print the first record, the field map and its remapped form to stderr
        #[arg(long)]
        sample: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    debug!(verbose = cli.verbose, "Logging initialized");

    match cli.command {
        Commands::Paths { config, ambiguity } => {
            handle_paths(&PathsArgs { config, ambiguity }).context("paths command failed")
        }
        Commands::Remap {
            config,
            input,
            output,
            on_error,
        } => handle_remap(&RemapArgs {
            config,
            input,
            output,
            on_error,
        })
        .context("remap command failed"),
        Commands::Generate {
            config,
            count,
            seed,
            remap,
            sample,
            output,
        } => handle_generate(&GenerateArgs {
            config,
            count,
            seed,
            remap,
            sample,
            output,
        })
        .context("generate command failed"),
    }
}
