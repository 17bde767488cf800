//! antok - anticipatory tokenizer CLI
//!
//! Subcommands:
//! - `antok tokenize` - Tokenize a directory of compound files into corpus shards
//! - `antok render <corpus>` - Render corpus windows back to MIDI
//! - `antok config` - Show the effective configuration and where it came from

use anyhow::{Context, Result};
use antconf::{AntConfig, Conditioning};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "antok")]
#[command(about = "Anticipatory tokenization of symbolic music")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./anticipation.toml)
    #[arg(short, long, global = true, env = "ANTICIPATION_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize every *.compound.txt file in the input directory
    Tokenize {
        /// Directory of compound files
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for tokenized-events-<shard>.txt
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Parallel shards
        #[arg(short, long)]
        workers: Option<usize>,

        /// Base seed; shard i uses seed + i
        #[arg(short, long)]
        seed: Option<u64>,

        /// Window prefix: anticipate or instruments
        #[arg(long)]
        conditioning: Option<Conditioning>,
    },

    /// Render corpus windows to .event.mid / .control.mid pairs
    Render {
        /// Corpus file
        corpus: PathBuf,

        /// First window (zero-based line number)
        #[arg(short, long, default_value = "0")]
        index: usize,

        /// Number of windows
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Output directory (defaults to the corpus file's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prefix tokens to skip (defaults to the configured conditioning)
        #[arg(long)]
        prefix_len: Option<usize>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, sources) = AntConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.telemetry.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    for path in &sources.files {
        tracing::debug!("loaded config from {}", path.display());
    }

    match cli.command {
        Commands::Tokenize {
            input,
            output,
            workers,
            seed,
            conditioning,
        } => {
            if let Some(input) = input {
                config.paths.input_dir = input;
            }
            if let Some(output) = output {
                config.paths.output_dir = output;
            }
            if let Some(workers) = workers {
                config.tokenize.workers = workers;
            }
            if let Some(seed) = seed {
                config.tokenize.seed = seed;
            }
            if let Some(conditioning) = conditioning {
                config.tokenize.conditioning = conditioning;
            }

            let stats = commands::tokenize(&config)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Render {
            corpus,
            index,
            count,
            output,
            prefix_len,
        } => {
            let prefix_len = prefix_len.unwrap_or(match config.tokenize.conditioning {
                Conditioning::Anticipate => 1,
                Conditioning::Instruments => anticipation::vocab::CONDITIONING_SLOTS,
            });
            let written = commands::render(&corpus, index, count, output.as_deref(), prefix_len)?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Commands::Config => {
            if sources.files.is_empty() {
                println!("# no config files found, using defaults");
            }
            for path in &sources.files {
                println!("# file: {}", path.display());
            }
            for var in &sources.env_overrides {
                println!("# env: {}", var);
            }
            println!("{}", config.to_toml());
        }
    }

    Ok(())
}
