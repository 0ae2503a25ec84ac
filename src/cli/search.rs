use anyhow::{Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use xlsearch::io::ProteinDatabase;
use xlsearch::report::ReportBuilder;
use xlsearch::runner::SearchRunner;

/// Search DTA spectra against a FASTA database and write a CSV report
pub fn run(
    spectra: Vec<PathBuf>,
    fasta: Vec<PathBuf>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    threads: Option<usize>,
) -> Result<()> {
    let start = Instant::now();
    let mut config = super::load_config(config.as_deref())?;
    if let Some(threads) = threads {
        config.runtime.threads = threads;
    }
    let options = config.resolve().context("Invalid search configuration")?;
    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.csv", options.job_id)));

    info!("Job {}: protease {}, {} digestion", options.job_id, options.rule.name(), options.mode);
    for linker in &options.linkers {
        info!("Linker {linker}");
    }

    let database = ProteinDatabase::load(&fasta, options.sequence.reverse)
        .context("Failed to load protein database")?;
    if database.is_empty() {
        warn!("Protein database is empty; no candidates can be found");
    }

    let runner = SearchRunner::new(options).context("Failed to start worker pool")?;
    let index = runner.build_index(&database).context("Failed to build peptide index")?;
    let mut report = runner
        .search_dta_files(&index, &spectra)
        .context("Failed to list spectra")?;
    report.sort_by_scan();

    for failure in &report.failures {
        warn!("{}: {}", failure.path.display(), failure.error);
    }

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let rows = ReportBuilder::new(&database, &runner.options().sequence)
        .write_csv(BufWriter::new(file), &report.results)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Search complete");
    println!("  Spectra searched:      {}", report.searched);
    println!("  With candidates:       {}", report.results.len());
    println!("  Failed:                {}", report.failures.len());
    println!("  Report rows:           {rows}");
    println!("  Output:                {}", output.display());
    println!("  Elapsed:               {:.2?}", start.elapsed());

    Ok(())
}
