use std::path::PathBuf;

/// A directory given as input could not be listed.
#[derive(Debug, thiserror::Error)]
#[error("failed to list {path}: {source}")]
pub struct ListError {
    /// Directory being listed
    pub path: PathBuf,
    /// Underlying error
    #[source]
    pub source: std::io::Error,
}

/// Errors raised while reading protein databases.
#[derive(Debug, thiserror::Error)]
pub enum FastaError {
    /// The file could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Residues appear before the first `>` header
    #[error("{path}:{line}: sequence data before the first header")]
    MissingHeader {
        /// Offending file
        path: PathBuf,
        /// One-based line number
        line: usize,
    },

    /// A header line carries no identifier
    #[error("{path}:{line}: header without identifier")]
    EmptyIdentifier {
        /// Offending file
        path: PathBuf,
        /// One-based line number
        line: usize,
    },

    /// A sequence line holds something other than a one-letter residue code
    #[error("{path}:{line}: invalid residue {residue:?}")]
    InvalidResidue {
        /// Offending file
        path: PathBuf,
        /// One-based line number
        line: usize,
        /// First offending character
        residue: char,
    },

    /// A `.gz` database was given to a build without gzip support
    #[error("{0} is gzip-compressed but gzip support is disabled")]
    GzipUnsupported(PathBuf),
}

/// Errors raised while reading DTA spectra.
#[derive(Debug, thiserror::Error)]
pub enum DtaError {
    /// The file could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file name does not follow `<base>.<scan>.<scan>.<charge>.dta`
    #[error("{0} is not named <base>.<scan>.<scan>.<charge>.dta")]
    InvalidName(PathBuf),

    /// The file has no `<Mh> <charge>` header
    #[error("{0}: missing precursor header")]
    MissingHeader(PathBuf),

    /// A line does not hold two numbers
    #[error("{path}:{line}: expected two numbers, found {content:?}")]
    InvalidLine {
        /// Offending file
        path: PathBuf,
        /// One-based line number
        line: usize,
        /// Line content
        content: String,
    },
}
