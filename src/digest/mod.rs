//! Protein digestion.
//!
//! A protein is cut into candidate peptides by a [`CleavageRule`] and filtered
//! by a [`DigestTolerance`]. Two enumerators implement the cut:
//!
//! - [`FullySpecificDigest`]: runs of adjacent cleavage fragments.
//! - [`NSpecificDigest`]: every substring with exactly 0, 1 or 2 specific ends.
//!
//! [`DigestMode`] selects between them and [`Digester`] wraps whichever was
//! chosen.
//!
//! ```rust
//! use xlsearch::digest::{CleavageRule, DigestMode, DigestTolerance, digest};
//! use xlsearch::sequence::Sequence;
//!
//! let trypsin = CleavageRule::builtin("trypsin").unwrap();
//! let protein = Sequence::protein("BGGGGKR");
//! let peptides = digest(&protein, &trypsin, DigestMode::Full, DigestTolerance::default())?;
//! let peptides: Vec<String> = peptides.iter().map(|p| p.to_string()).collect();
//! assert_eq!(peptides, vec!["BGGGGK", "BGGGGKR"]);
//! # Ok::<(), xlsearch::digest::DigestError>(())
//! ```

mod error;
mod fully;
mod nspecific;
mod rule;
mod tolerance;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enumerate::{Enumerator, Step};
use crate::sequence::Sequence;

pub use error::DigestError;
pub use fully::FullySpecificDigest;
pub use nspecific::NSpecificDigest;
pub use rule::{CleavageRule, BUILTIN_RULES, DEFAULT_PROTEASE};
pub use tolerance::DigestTolerance;

/// How specific both peptide ends must be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestMode {
    /// Both ends on cleavage sites.
    #[default]
    Full,
    /// Exactly one end on a cleavage site.
    Partial,
    /// Neither end on a cleavage site.
    None,
}

impl DigestMode {
    /// Number of specific ends this mode requires.
    pub fn trypticity(&self) -> u8 {
        match self {
            DigestMode::Full => 2,
            DigestMode::Partial => 1,
            DigestMode::None => 0,
        }
    }
}

impl fmt::Display for DigestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestMode::Full => write!(f, "full"),
            DigestMode::Partial => write!(f, "partial"),
            DigestMode::None => write!(f, "none"),
        }
    }
}

impl FromStr for DigestMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(DigestMode::Full),
            "partial" => Ok(DigestMode::Partial),
            "none" => Ok(DigestMode::None),
            other => Err(other.to_string()),
        }
    }
}

/// A digestion enumerator of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Digester {
    /// Runs of cleavage fragments.
    Fully(FullySpecificDigest),
    /// Substrings with a fixed number of specific ends.
    NSpecific(NSpecificDigest),
}

impl Digester {
    /// Prepare a digestion of `sequence` in the given mode.
    pub fn new(
        sequence: &Sequence,
        rule: &CleavageRule,
        mode: DigestMode,
        tolerance: DigestTolerance,
    ) -> Result<Self, DigestError> {
        Ok(match mode {
            DigestMode::Full => {
                Digester::Fully(FullySpecificDigest::new(sequence, rule, tolerance)?)
            }
            mode => Digester::NSpecific(NSpecificDigest::new(
                sequence,
                rule,
                tolerance,
                mode.trypticity(),
            )?),
        })
    }
}

impl Enumerator for Digester {
    type Item = Sequence;

    fn advance(&mut self) -> Step<Sequence> {
        match self {
            Digester::Fully(digest) => digest.advance(),
            Digester::NSpecific(digest) => digest.advance(),
        }
    }
}

/// Digest a sequence completely.
pub fn digest(
    sequence: &Sequence,
    rule: &CleavageRule,
    mode: DigestMode,
    tolerance: DigestTolerance,
) -> Result<Vec<Sequence>, DigestError> {
    Ok(Digester::new(sequence, rule, mode, tolerance)?
        .into_iter_adapter()
        .collect())
}
