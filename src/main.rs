//! # xlsearch
//!
//! Command-line front end for cross-linked peptide candidate search.
//!
//! ## Usage
//!
//! ```bash
//! # Search DTA spectra against a FASTA database
//! xlsearch search --config search.toml --fasta proteins.fasta --output hits.csv spectra/
//!
//! # List the peptides a protease produces
//! xlsearch digest --fasta proteins.fasta
//!
//! # Show the built-in cross-linkers
//! xlsearch linkers
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
