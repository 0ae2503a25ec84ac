/// Errors raised while digesting a protein.
///
/// These indicate logic errors rather than bad input and abort the build.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// Fragments cut from a sequence do not cover it exactly
    #[error("fragment lengths sum to {actual}, expected {expected} for {sequence}")]
    FragmentLengthMismatch {
        /// Residues of the digested sequence
        sequence: String,
        /// Parent length
        expected: usize,
        /// Sum of fragment lengths
        actual: usize,
    },

    /// Digestion input is a chain whose parts are not adjacent in one protein
    #[error("cannot digest non-contiguous sequence {0}")]
    NotContiguous(String),
}
