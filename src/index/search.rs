use std::collections::HashSet;

use crate::enumerate::Enumerator;
use crate::mass_gen::{CandidateMass, SequenceMassGenerator, SequenceOptions};
use crate::sequence::Sequence;

use super::range::{MassRange, SearchTolerance};
use super::MassIndex;

/// A peptide in one modification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Candidate {
    /// The peptide.
    pub sequence: Sequence,
    /// Its configuration and precursor mass.
    pub mass: CandidateMass,
}

/// Deduplicated candidates from one search.
pub type Candidates = HashSet<Candidate>;

/// Candidates with Mh in `range` among peptides accepted by `accept`.
///
/// Negative windows are clamped first. Each peptide returned by the index is
/// re-weighed and only configurations inside `range` are kept.
pub fn search_range_with<F>(
    index: &MassIndex,
    range: MassRange,
    options: &SequenceOptions,
    accept: F,
) -> Candidates
where
    F: Fn(&Sequence) -> bool,
{
    let range = range.clamped();
    let mut found = Candidates::new();
    for entry in index.query(&range) {
        let sequence = entry.sequence();
        if !accept(sequence) {
            continue;
        }
        let in_range = SequenceMassGenerator::new(sequence, options)
            .filtered(move |candidate: &CandidateMass| range.contains(candidate.mh));
        found.extend(in_range.into_iter_adapter().map(|mass| Candidate {
            sequence: sequence.clone(),
            mass,
        }));
    }
    found
}

/// Candidates with Mh in `range`.
pub fn search_range(index: &MassIndex, range: MassRange, options: &SequenceOptions) -> Candidates {
    search_range_with(index, range, options, |_| true)
}

/// Unlinked peptides matching an experimental Mh.
pub fn peptide_search(
    index: &MassIndex,
    experimental_mh: f64,
    options: &SequenceOptions,
    tolerance: SearchTolerance,
) -> Candidates {
    search_range(index, MassRange::around(experimental_mh, tolerance), options)
}
