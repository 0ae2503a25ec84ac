use std::path::PathBuf;

/// Errors raised while loading or validating a search configuration.
///
/// All of these abort the run before any work starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or schema error
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// No built-in protease has this name
    #[error("unknown protease '{0}'")]
    UnknownProtease(String),

    /// A custom cleavage pattern does not compile
    #[error("invalid cleavage rule '{name}': {source}")]
    InvalidCleavageRule {
        /// Rule name
        name: String,
        /// Regex compile error
        #[source]
        source: regex::Error,
    },

    /// Trypticity other than full, partial or none
    #[error("unknown trypticity '{0}' (expected full, partial or none)")]
    UnknownTrypticity(String),

    /// Mass type other than monoisotopic or average
    #[error("unknown mass type '{0}' (expected monoisotopic or average)")]
    UnknownMassType(String),

    /// Precursor tolerance type other than ppm or mz
    #[error("unknown precursor tolerance type '{0}' (expected ppm or mz)")]
    UnknownToleranceType(String),

    /// Negative or out-of-range tolerance value
    #[error("invalid precursor tolerance {value} {kind}")]
    InvalidTolerance {
        /// Tolerance type
        kind: String,
        /// Offending value
        value: f64,
    },

    /// Minimum length exceeds maximum length
    #[error("digest min_length {min} exceeds max_length {max}")]
    InvalidLengthBounds {
        /// Minimum length
        min: usize,
        /// Inclusive maximum length
        max: usize,
    },

    /// A modification symbol is used but has no mass
    #[error("modification '{0}' has no mass")]
    MissingModMass(char),

    /// No built-in linker has this name and no custom definition was given
    #[error("unknown linker '{0}'")]
    UnknownLinker(String),

    /// A custom linker lists neither one nor two reaction groups
    #[error("linker '{linker}' has {count} reaction groups (expected 1 or 2)")]
    InvalidReactionGroups {
        /// Linker name
        linker: String,
        /// Number of groups given
        count: usize,
    },
}
