//! Integration tests for xlsearch
//!
//! These tests run the full pipeline from configuration, FASTA and DTA files
//! on disk through the worker pool to the CSV report.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;
use xlsearch::config::{Config, ConfigError};
use xlsearch::index::SearchTolerance;
use xlsearch::io::ProteinDatabase;
use xlsearch::linker::{Linker, ReactionGroup};
use xlsearch::mass::constants;
use xlsearch::mass_gen::{mass_bounds, SequenceOptions};
use xlsearch::report::ReportBuilder;
use xlsearch::runner::{SearchError, SearchRunner};
use xlsearch::sequence::Sequence;

const FASTA: &str = ">sp|XL1 first\nBGGGGKR\n>sp|XL2 second\nECCHGDLL\nECADDR\n";

const CONFIG: &str = r#"
[job]
id = "bs3-scenario"

[digest]
protease = "trypsin"
trypticity = "full"

[[linkers]]
name = "light-bs3"

[analysis.precursor_search]
type = "ppm"
tolerance = 250.0

[runtime]
threads = 2
"#;

fn mh(residues: &str, options: &SequenceOptions) -> f64 {
    mass_bounds(&Sequence::protein(residues), options).unwrap().0
}

fn write_dta(dir: &Path, scan: u32, precursor_mh: f64) {
    let name = format!("scenario.{scan}.{scan}.2.dta");
    fs::write(dir.join(name), format!("{precursor_mh:.6} 2\n150.1 10.0\n250.2 20.0\n")).unwrap();
}

/// Test the complete search from files to report
#[test]
fn test_bs3_interlink_from_files() {
    let dir = tempdir().unwrap();
    let fasta = dir.path().join("proteins.fasta");
    fs::write(&fasta, FASTA).unwrap();
    let spectra = dir.path().join("spectra");
    fs::create_dir(&spectra).unwrap();

    let options = Config::from_toml_str(CONFIG).unwrap().resolve().unwrap();
    assert_eq!(options.job_id, "bs3-scenario");
    assert_eq!(options.precursor_tolerance, SearchTolerance::Ppm(250.0));

    let sequence = options.sequence.clone();
    let interlinked = mh("BGGGGKR", &sequence) + mh("ECCHGDLLECADDR", &sequence) + 138.06808
        - constants::H;
    write_dta(&spectra, 101, interlinked);
    write_dta(&spectra, 102, 50_000.0);

    let database = ProteinDatabase::load(&[&fasta], false).unwrap();
    assert_eq!(database.len(), 2);

    let runner = SearchRunner::new(options).unwrap();
    let index = runner.build_index(&database).unwrap();
    // BGGGGK, BGGGGKR and the single fragment of the second protein
    assert_eq!(index.len(), 3);

    let mut report = runner.search_dta_files(&index, &[&spectra]).unwrap();
    report.sort_by_scan();
    assert_eq!(report.searched, 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.results.len(), 1);

    let found = &report.results[0];
    assert_eq!(found.spectrum.scan, 101);
    let (linker, linked) = &found.candidates.linked[0];
    assert_eq!(linker.name(), "light-bs3");
    assert_eq!(linked.interlink_pairs(), 1);

    let output = dir.path().join("report.csv");
    let file = fs::File::create(&output).unwrap();
    let rows = ReportBuilder::new(&database, &sequence)
        .write_csv(file, &report.results)
        .unwrap();
    assert!(rows >= 1);

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let interlinks: Vec<csv::StringRecord> = reader
        .records()
        .map(Result::unwrap)
        .filter(|record| &record[column("category")] == "interlinked")
        .collect();
    assert_eq!(interlinks.len(), 1);
    let row = &interlinks[0];
    assert_eq!(&row[column("scan")], "101");
    assert_eq!(&row[column("linker")], "light-bs3");
    assert_eq!(&row[column("peptide1")], "BGGGGKR");
    assert_eq!(&row[column("protein1")], "sp|XL1");
    assert_eq!(&row[column("peptide2")], "ECCHGDLLECADDR");
    assert_eq!(&row[column("protein2")], "sp|XL2");
}

/// Test that an empty database searches cleanly
#[test]
fn test_empty_database() {
    let dir = tempdir().unwrap();
    let fasta = dir.path().join("empty.fasta");
    fs::write(&fasta, "").unwrap();
    write_dta(dir.path(), 1, 1200.0);

    let options = Config::default().resolve().unwrap();
    let runner = SearchRunner::new(options).unwrap();
    let database = ProteinDatabase::load(&[&fasta], false).unwrap();
    let index = runner.build_index(&database).unwrap();
    assert!(index.is_empty());

    let report = runner.search_dta_files(&index, &[dir.path()]).unwrap();
    assert_eq!(report.searched, 1);
    assert!(report.results.is_empty());
}

/// Test that a linker without masses only yields unlinked candidates
#[test]
fn test_linker_without_masses() {
    let mut options = Config::default().resolve().unwrap();
    options.linkers = vec![Arc::new(Linker::new(
        "inert",
        ReactionGroup::nh2(),
        ReactionGroup::nh2(),
    ))];
    let sequence = options.sequence.clone();
    let runner = SearchRunner::new(options).unwrap();

    let database = ProteinDatabase::from_proteins(vec![xlsearch::io::Protein {
        id: "P1".to_string(),
        description: String::new(),
        sequence: Sequence::protein("BGGGGKR"),
    }]);
    let index = runner.build_index(&database).unwrap();
    let found = runner.search_mass(&index, mh("BGGGGKR", &sequence));
    assert_eq!(found.unlinked.len(), 1);
    assert!(found.linked.iter().all(|(_, linked)| linked.is_empty()));
}

/// Test that unreadable spectra are reported without stopping the search
#[test]
fn test_failures_are_isolated() {
    let dir = tempdir().unwrap();
    let options = Config::default().resolve().unwrap();
    let sequence = options.sequence.clone();
    let runner = SearchRunner::new(options).unwrap();
    let database = ProteinDatabase::from_proteins(vec![xlsearch::io::Protein {
        id: "P1".to_string(),
        description: String::new(),
        sequence: Sequence::protein("BGGGGKR"),
    }]);
    let index = runner.build_index(&database).unwrap();

    for scan in 1..=4 {
        write_dta(dir.path(), scan, mh("BGGGGKR", &sequence));
    }
    fs::write(dir.path().join("scenario.5.5.2.dta"), "precursor? 2\n").unwrap();

    let report = runner.search_dta_files(&index, &[dir.path()]).unwrap();
    assert_eq!(report.searched, 5);
    assert_eq!(report.results.len(), 4);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, SearchError::Dta(_)));
    assert!(report.failures[0].path.ends_with("scenario.5.5.2.dta"));
}

/// Test JSON configuration files
#[test]
fn test_json_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("search.json");
    fs::write(
        &path,
        r#"{
            "digest": { "protease": "gluc", "trypticity": "partial" },
            "linkers": [{ "name": "edc" }],
            "analysis": { "precursor_search": { "type": "mz", "tolerance": 0.5 } }
        }"#,
    )
    .unwrap();
    let options = Config::from_file(&path).unwrap().resolve().unwrap();
    assert_eq!(options.rule.name(), "gluc");
    assert_eq!(options.mode.to_string(), "partial");
    assert_eq!(options.linkers[0].name(), "edc");
    assert_eq!(options.precursor_tolerance, SearchTolerance::Mass(0.5));

    fs::write(&path, r#"{ "linkers": [{ "name": "glue" }] }"#).unwrap();
    let err = Config::from_file(&path).unwrap().resolve().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownLinker(name) if name == "glue"));
}
