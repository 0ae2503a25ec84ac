use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use xlsearch::config::Config;

mod digest;
mod linkers;
mod search;

/// xlsearch - Cross-linked peptide candidate search
#[derive(Parser)]
#[command(name = "xlsearch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search DTA spectra for linked and unlinked candidates
    Search {
        /// DTA files or directories holding them
        #[arg(value_name = "SPECTRA", required = true)]
        spectra: Vec<PathBuf>,

        /// FASTA files or directories (.fa, .fasta, .gz)
        #[arg(short, long, value_name = "FASTA", required = true)]
        fasta: Vec<PathBuf>,

        /// Search configuration (TOML, or JSON with a .json extension)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// CSV report (defaults to <job id>.csv)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Worker threads, overriding the configuration (0 = one per CPU)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },

    /// Print the peptides of a FASTA database with their mass ranges
    Digest {
        /// FASTA files or directories
        #[arg(short, long, value_name = "FASTA", required = true)]
        fasta: Vec<PathBuf>,

        /// Search configuration supplying protease and modifications
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the built-in cross-linkers
    Linkers,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search {
            spectra,
            fasta,
            config,
            output,
            threads,
        } => search::run(spectra, fasta, config, output, threads),
        Commands::Digest { fasta, config } => digest::run(fasta, config),
        Commands::Linkers => linkers::run(),
    }
}

/// Load the configuration file, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(Config::default()),
    }
}
