use std::path::PathBuf;

use crate::digest::DigestError;
use crate::io::DtaError;

/// Errors raised by the search orchestrator.
///
/// Index construction errors abort the run. Errors inside a spectrum task are
/// recorded in the report and the remaining spectra continue.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The worker pool could not be started
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// A protein could not be digested
    #[error("digestion failed: {0}")]
    Digest(#[from] DigestError),

    /// A spectrum file could not be read
    #[error(transparent)]
    Dta(#[from] DtaError),

    /// Spectrum inputs could not be listed
    #[error("failed to list spectra in {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A task panicked
    #[error("task panicked: {0}")]
    Panicked(String),
}
