use anyhow::{Context, Result};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use xlsearch::digest::Digester;
use xlsearch::enumerate::Enumerator;
use xlsearch::io::ProteinDatabase;
use xlsearch::mass_gen::mass_bounds;

/// Print every peptide of the database with the Mh range its configurations span
pub fn run(fasta: Vec<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config.as_deref())?;
    let options = config.resolve().context("Invalid search configuration")?;
    let database = ProteinDatabase::load(&fasta, options.sequence.reverse)
        .context("Failed to load protein database")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "protein\tpeptide\tmin_mh\tmax_mh")?;

    let mut peptides = 0usize;
    for protein in database.proteins() {
        let digester = Digester::new(
            &protein.sequence,
            &options.rule,
            options.mode,
            options.digest_tolerance,
        )
        .with_context(|| format!("Failed to digest {}", protein.id))?;
        for peptide in digester.into_iter_adapter() {
            let Some((low, high)) = mass_bounds(&peptide, &options.sequence) else {
                continue;
            };
            writeln!(out, "{}\t{}\t{:.5}\t{:.5}", protein.id, peptide, low, high)?;
            peptides += 1;
        }
    }
    out.flush()?;
    log::info!("{} peptides from {} proteins", peptides, database.len());
    Ok(())
}
