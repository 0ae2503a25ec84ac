//! Candidate precursor masses of a peptide.
//!
//! [`SequenceMassGenerator`] walks every static × dynamic modification count
//! configuration of one sequence (static outer, dynamic inner) and produces a
//! [`CandidateMass`] for each: the Mh of the hydrated peptide together with the
//! modification counts that produced it.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::enumerate::{Enumerator, Step};
use crate::mass::{constants, mh_from_m, MassType, ResidueMasses};
use crate::modification::{aggregate, ModCount, ModificationTable, MultiModCountEnumerator};
use crate::sequence::Sequence;

/// How sequences are weighed: residue masses plus modification tables.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOptions {
    /// Identifier of this option set.
    pub id: String,
    /// Residue mass table in use.
    pub mass_type: MassType,
    /// Residue masses, including any additional residues.
    pub residue_masses: ResidueMasses,
    /// Modifications applied to every eligible residue.
    pub static_mods: ModificationTable,
    /// Modifications applied to any subset of eligible residues.
    pub dynamic_mods: ModificationTable,
    /// Proteins are reversed on load (decoy search).
    pub reverse: bool,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            id: "std".to_string(),
            mass_type: MassType::Monoisotopic,
            residue_masses: ResidueMasses::standard(MassType::Monoisotopic),
            static_mods: ModificationTable::new(),
            dynamic_mods: ModificationTable::new(),
            reverse: false,
        }
    }
}

impl SequenceOptions {
    /// Options with the given residue mass table and no modifications.
    pub fn with_mass_type(mass_type: MassType) -> Self {
        Self {
            mass_type,
            residue_masses: ResidueMasses::standard(mass_type),
            ..Self::default()
        }
    }
}

/// One modification configuration of a sequence and its precursor mass.
///
/// Equality and hashing cover all three fields; the mass is compared bitwise.
#[derive(Debug, Clone)]
pub struct CandidateMass {
    /// Singly protonated precursor mass.
    pub mh: f64,
    /// Static modification counts per symbol.
    pub static_mods: ModCount,
    /// Dynamic modification counts per symbol.
    pub dynamic_mods: ModCount,
}

impl CandidateMass {
    /// Neutral mass of the hydrated peptide.
    pub fn hydrated_mass(&self) -> f64 {
        crate::mass::m_from_mh(self.mh)
    }
}

impl PartialEq for CandidateMass {
    fn eq(&self, other: &Self) -> bool {
        self.mh.to_bits() == other.mh.to_bits()
            && self.static_mods == other.static_mods
            && self.dynamic_mods == other.dynamic_mods
    }
}

impl Eq for CandidateMass {}

impl Hash for CandidateMass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mh.to_bits().hash(state);
        self.static_mods.hash(state);
        self.dynamic_mods.hash(state);
    }
}

impl Ord for CandidateMass {
    fn cmp(&self, other: &Self) -> Ordering {
        self.mh
            .total_cmp(&other.mh)
            .then_with(|| self.static_mods.cmp(&other.static_mods))
            .then_with(|| self.dynamic_mods.cmp(&other.dynamic_mods))
    }
}

impl PartialOrd for CandidateMass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Enumerates the candidate masses of one sequence.
#[derive(Debug, Clone)]
pub struct SequenceMassGenerator<'a> {
    options: &'a SequenceOptions,
    residue_mass: f64,
    statics: MultiModCountEnumerator,
    dynamics: MultiModCountEnumerator,
    current_static: Option<(ModCount, f64)>,
}

impl<'a> SequenceMassGenerator<'a> {
    /// Prepare the configurations of `sequence` under `options`.
    pub fn new(sequence: &Sequence, options: &'a SequenceOptions) -> Self {
        let static_eligible = options.static_mods.eligible_counts(sequence);
        let dynamic_eligible = options.dynamic_mods.eligible_counts(sequence);
        Self {
            options,
            residue_mass: options.residue_masses.sum(sequence.residues()),
            statics: MultiModCountEnumerator::exact(
                options.static_mods.residue_mods(),
                &static_eligible,
            ),
            dynamics: MultiModCountEnumerator::up_to(
                options.dynamic_mods.residue_mods(),
                &dynamic_eligible,
            ),
            current_static: None,
        }
    }

    /// Sum of unmodified residue masses.
    pub fn residue_mass(&self) -> f64 {
        self.residue_mass
    }
}

impl Enumerator for SequenceMassGenerator<'_> {
    type Item = CandidateMass;

    fn advance(&mut self) -> Step<CandidateMass> {
        loop {
            if self.current_static.is_none() {
                match self.statics.advance() {
                    Step::Produced(counts) => {
                        let counts = aggregate(&counts);
                        let mass = self.options.static_mods.mass_of(&counts);
                        self.current_static = Some((counts, mass));
                    }
                    Step::Exhausted => return Step::Exhausted,
                }
            }
            let Some((static_mods, static_mass)) = &self.current_static else {
                continue;
            };

            match self.dynamics.advance() {
                Step::Produced(counts) => {
                    let dynamic_mods = aggregate(&counts);
                    let hydrated = self.residue_mass
                        + constants::H2O
                        + static_mass
                        + self.options.dynamic_mods.mass_of(&dynamic_mods);
                    return Step::Produced(CandidateMass {
                        mh: mh_from_m(hydrated),
                        static_mods: static_mods.clone(),
                        dynamic_mods,
                    });
                }
                Step::Exhausted => self.current_static = None,
            }
        }
    }
}

/// Lowest and highest Mh over every configuration of `sequence`.
pub fn mass_bounds(sequence: &Sequence, options: &SequenceOptions) -> Option<(f64, f64)> {
    let mut generator = SequenceMassGenerator::new(sequence, options);
    let mut bounds: Option<(f64, f64)> = None;
    while let Step::Produced(candidate) = generator.advance() {
        bounds = Some(match bounds {
            Some((low, high)) => (low.min(candidate.mh), high.max(candidate.mh)),
            None => (candidate.mh, candidate.mh),
        });
    }
    bounds
}
