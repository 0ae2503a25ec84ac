//! FASTA protein databases.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use super::error::FastaError;
use super::expand_paths;
use crate::sequence::Sequence;

/// Extensions recognised when a directory is given as a database.
pub const FASTA_EXTENSIONS: &[&str] = &["fa", "fasta", "gz"];

/// One database entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protein {
    /// First token of the header.
    pub id: String,
    /// Remainder of the header.
    pub description: String,
    /// Residues, with both protein termini.
    pub sequence: Sequence,
}

/// Proteins of one search, in load order.
#[derive(Debug, Clone, Default)]
pub struct ProteinDatabase {
    proteins: Vec<Protein>,
}

impl ProteinDatabase {
    /// Database holding `proteins`.
    pub fn from_proteins(proteins: Vec<Protein>) -> Self {
        Self { proteins }
    }

    /// Load every FASTA file named by `paths`, expanding directories.
    pub fn load<P: AsRef<Path>>(paths: &[P], reverse: bool) -> Result<Self, FastaError> {
        let files = expand_paths(paths, FASTA_EXTENSIONS).map_err(|failed| FastaError::Io {
            path: failed.path,
            source: failed.source,
        })?;
        let mut proteins = Vec::new();
        for file in &files {
            let loaded = read_fasta_file(file, reverse)?;
            debug!("Loaded {} proteins from {}", loaded.len(), file.display());
            proteins.extend(loaded);
        }
        info!("Loaded {} proteins from {} files", proteins.len(), files.len());
        Ok(Self { proteins })
    }

    /// Number of proteins.
    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    /// Whether the database is empty.
    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    /// Proteins in load order.
    pub fn proteins(&self) -> &[Protein] {
        &self.proteins
    }

    /// Entry whose sequence shares `sequence`'s root.
    pub fn protein_of(&self, sequence: &Sequence) -> Option<&Protein> {
        self.proteins
            .iter()
            .find(|protein| std::sync::Arc::ptr_eq(protein.sequence.root(), sequence.root()))
    }
}

fn open(path: &Path) -> Result<Box<dyn BufRead>, FastaError> {
    let io_error = |source| FastaError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if !gzipped {
        return Ok(Box::new(BufReader::new(file)));
    }
    #[cfg(feature = "gzip")]
    {
        Ok(Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file))))
    }
    #[cfg(not(feature = "gzip"))]
    {
        drop(file);
        Err(FastaError::GzipUnsupported(path.to_path_buf()))
    }
}

fn read_fasta_file(path: &Path, reverse: bool) -> Result<Vec<Protein>, FastaError> {
    read_fasta(open(path)?, path, reverse)
}

/// Parse FASTA records from `reader`. `path` labels errors.
///
/// Blank lines are ignored and sequence lines are concatenated with
/// surrounding whitespace removed. Residues must be ASCII letters. With
/// `reverse`, residues are reversed (decoy database).
pub fn read_fasta<R: BufRead>(
    reader: R,
    path: &Path,
    reverse: bool,
) -> Result<Vec<Protein>, FastaError> {
    let mut proteins = Vec::new();
    let mut current: Option<(String, String, String)> = None;

    let finish = |entry: Option<(String, String, String)>, proteins: &mut Vec<Protein>| {
        if let Some((id, description, residues)) = entry {
            let residues = if reverse {
                residues.chars().rev().collect()
            } else {
                residues
            };
            proteins.push(Protein {
                id,
                description,
                sequence: Sequence::protein(residues),
            });
        }
    };

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| FastaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            finish(current.take(), &mut proteins);
            let header = header.trim();
            let (id, description) = header.split_once(char::is_whitespace).unwrap_or((header, ""));
            if id.is_empty() {
                return Err(FastaError::EmptyIdentifier {
                    path: path.to_path_buf(),
                    line: number + 1,
                });
            }
            current = Some((id.to_string(), description.trim().to_string(), String::new()));
        } else {
            if let Some(residue) = line.chars().find(|c| !c.is_ascii_alphabetic()) {
                return Err(FastaError::InvalidResidue {
                    path: path.to_path_buf(),
                    line: number + 1,
                    residue,
                });
            }
            match current.as_mut() {
                Some((_, _, residues)) => residues.push_str(line),
                None => {
                    return Err(FastaError::MissingHeader {
                        path: path.to_path_buf(),
                        line: number + 1,
                    })
                }
            }
        }
    }
    finish(current, &mut proteins);
    Ok(proteins)
}
