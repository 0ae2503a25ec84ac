//! Input readers: protein databases and DTA spectra.

mod dta;
mod error;
mod fasta;

use std::fs;
use std::path::{Path, PathBuf};

pub use dta::{parse_dta, parse_dta_name, read_dta, select_unique_scans, DtaName, Spectrum};
pub use error::{DtaError, FastaError, ListError};
pub use fasta::{read_fasta, Protein, ProteinDatabase, FASTA_EXTENSIONS};

/// Expand directories into the files they directly contain whose extension
/// is one of `extensions`. Plain file paths are kept as given.
///
/// Each directory's files are sorted by path. An error names the directory
/// that could not be listed.
pub fn expand_paths<P: AsRef<Path>>(
    paths: &[P],
    extensions: &[&str],
) -> Result<Vec<PathBuf>, ListError> {
    let mut expanded = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            expanded.push(path.to_path_buf());
            continue;
        }
        let mut found = list_dir(path, extensions).map_err(|source| ListError {
            path: path.to_path_buf(),
            source,
        })?;
        found.sort();
        expanded.extend(found);
    }
    Ok(expanded)
}

fn list_dir(dir: &Path, extensions: &[&str]) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let file = entry?.path();
        if file.is_file() && has_extension(&file, extensions) {
            found.push(file);
        }
    }
    Ok(found)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}
