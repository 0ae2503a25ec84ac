//! # xlsearch - Cross-linked Peptide Candidate Search
//!
//! `xlsearch` finds the peptides, and pairs of peptides joined by a chemical
//! cross-linker, whose theoretical mass explains an observed precursor mass.
//!
//! ## Key Features
//!
//! - **Lazy enumeration**: digestion windows, modification counts, placements
//!   and candidate masses are all resumable [`enumerate::Enumerator`]s, so no
//!   combinatorial space is materialised before it is needed.
//!
//! - **Digestion**: fully specific (missed cleavages) and N-specific
//!   (semi and non-specific) digestion with built-in protease rules.
//!
//! - **Modifications**: static and dynamic modifications with exact per-residue
//!   counting and placement.
//!
//! - **Mass index**: every peptide is stored under the Mh interval its
//!   configurations can span, for fast tolerance-window lookups.
//!
//! - **Cross-linkers**: unlinked, deadend, intralinked and interlinked
//!   candidates for any number of linkers, with symmetric pairs collapsed.
//!
//! - **Parallel search**: index construction and per-spectrum search run on a
//!   worker pool; a failing spectrum never aborts the others.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use xlsearch::prelude::*;
//!
//! let options = SequenceOptions::default();
//! let trypsin = CleavageRule::builtin("trypsin").unwrap();
//! let protein = Sequence::protein("MKWVTFISLLLLFSSAYSRGVFRR");
//! let peptides = digest(&protein, &trypsin, DigestMode::Full, DigestTolerance::default())?;
//! let index = MassIndex::build(peptides, &options);
//!
//! let search = CandidateSearch::new(&index, &options, SearchTolerance::Ppm(10.0));
//! let linkers = vec![Arc::new(Linker::builtin("light-bs3").unwrap())];
//! let found = search.candidates(&linkers, 1500.0);
//! println!("{} candidates", found.counts().total());
//! # Ok::<(), xlsearch::digest::DigestError>(())
//! ```
//!
//! ## Modules
//!
//! - [`sequence`]: shared protein sequences, peptide views and chains
//! - [`mass`]: residue masses and Mh/m/z conversions
//! - [`digest`]: cleavage rules and digestion enumerators
//! - [`modification`]: modification tables, counts and placements
//! - [`mass_gen`]: candidate masses of one peptide
//! - [`index`]: the mass-indexed peptide lookup
//! - [`linker`]: cross-linkers and reaction groups
//! - [`candidates`]: candidate assembly per precursor mass
//! - [`config`]: TOML/JSON search configuration
//! - [`io`]: FASTA databases and DTA spectra
//! - [`runner`]: concurrent index construction and spectrum search
//! - [`report`]: CSV output

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod candidates;
pub mod config;
pub mod digest;
pub mod enumerate;
pub mod index;
pub mod io;
pub mod linker;
pub mod mass;
pub mod mass_gen;
pub mod modification;
pub mod report;
pub mod runner;
pub mod sequence;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::candidates::{CandidatePeptides, CandidateSearch, LinkedCandidates};
    pub use crate::config::{Config, ConfigError, SearchOptions};
    pub use crate::digest::{
        digest, CleavageRule, DigestError, DigestMode, DigestTolerance, Digester,
    };
    pub use crate::enumerate::{EnumIter, Enumerator, Step};
    pub use crate::index::{Candidate, Candidates, MassIndex, MassRange, SearchTolerance};
    pub use crate::io::{DtaError, FastaError, Protein, ProteinDatabase, Spectrum};
    pub use crate::linker::{builtin_linkers, Linker, ReactionGroup};
    pub use crate::mass::{MassType, ResidueMasses};
    pub use crate::mass_gen::{CandidateMass, SequenceMassGenerator, SequenceOptions};
    pub use crate::modification::ModificationTable;
    pub use crate::report::ReportBuilder;
    pub use crate::runner::{SearchError, SearchReport, SearchRunner};
    pub use crate::sequence::Sequence;
}
