//! Candidate peptides for one precursor mass.
//!
//! [`CandidateSearch`] bundles what every lookup needs (the index, the mass
//! options and the precursor tolerance) and derives each category from the
//! experimental Mh:
//!
//! - unlinked: the Mh itself.
//! - deadend: Mh minus the deadend mass, searched with either group.
//! - intralinked: Mh minus the intralink mass, both ends on one peptide.
//! - interlinked: Mh minus the interlink mass, split over two peptides.

use std::collections::HashMap;
use std::sync::Arc;

use crate::index::{
    peptide_search, search_range_with, Candidate, Candidates, MassIndex, MassRange,
    SearchTolerance,
};
use crate::linker::Linker;
use crate::mass::{m_from_mh, mh_from_m};
use crate::mass_gen::SequenceOptions;

/// Peptide-1 candidates mapped to every peptide 2 completing the pair.
pub type Interlinks = HashMap<Candidate, Candidates>;

/// Candidates of one linker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedCandidates {
    /// Peptides capped by a linker reacting at one end.
    pub deadend: Candidates,
    /// Peptides with both linker ends attached.
    pub intralinked: Candidates,
    /// Peptide pairs joined by the linker.
    pub interlinked: Interlinks,
}

impl LinkedCandidates {
    /// Whether every category is empty.
    pub fn is_empty(&self) -> bool {
        self.deadend.is_empty() && self.intralinked.is_empty() && self.interlinked.is_empty()
    }

    /// Number of peptide pairs.
    pub fn interlink_pairs(&self) -> usize {
        self.interlinked.values().map(Candidates::len).sum()
    }
}

/// Every candidate for one precursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePeptides {
    /// Peptides without a linker.
    pub unlinked: Candidates,
    /// Linked candidates per configured linker.
    pub linked: Vec<(Arc<Linker>, LinkedCandidates)>,
}

impl CandidatePeptides {
    /// Whether anything at all was found.
    pub fn has_candidates(&self) -> bool {
        !self.unlinked.is_empty() || self.linked.iter().any(|(_, linked)| !linked.is_empty())
    }

    /// Totals per category, summed over linkers.
    pub fn counts(&self) -> CandidateCounts {
        let mut counts = CandidateCounts {
            unlinked: self.unlinked.len(),
            ..CandidateCounts::default()
        };
        for (_, linked) in &self.linked {
            counts.deadend += linked.deadend.len();
            counts.intralinked += linked.intralinked.len();
            counts.interlinked += linked.interlink_pairs();
        }
        counts
    }
}

/// Number of candidates per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateCounts {
    /// Unlinked peptides
    pub unlinked: usize,
    /// Deadend peptides
    pub deadend: usize,
    /// Intralinked peptides
    pub intralinked: usize,
    /// Interlinked pairs
    pub interlinked: usize,
}

impl CandidateCounts {
    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.unlinked + self.deadend + self.intralinked + self.interlinked
    }
}

/// Lookups against one index under one set of options.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSearch<'a> {
    index: &'a MassIndex,
    options: &'a SequenceOptions,
    tolerance: SearchTolerance,
}

impl<'a> CandidateSearch<'a> {
    /// Searches on `index` weighing peptides with `options`.
    pub fn new(
        index: &'a MassIndex,
        options: &'a SequenceOptions,
        tolerance: SearchTolerance,
    ) -> Self {
        Self {
            index,
            options,
            tolerance,
        }
    }

    /// Precursor tolerance in use.
    pub fn tolerance(&self) -> SearchTolerance {
        self.tolerance
    }

    fn window(&self, mh: f64) -> MassRange {
        MassRange::around(mh, self.tolerance)
    }

    /// Peptides matching `experimental_mh` directly.
    pub fn unlinked(&self, experimental_mh: f64) -> Candidates {
        peptide_search(self.index, experimental_mh, self.options, self.tolerance)
    }

    /// Peptides carrying a deadend of `linker`.
    pub fn deadend(&self, linker: &Linker, experimental_mh: f64) -> Candidates {
        let Some(mass) = linker.deadend_mass() else {
            return Candidates::new();
        };
        let window = self.window(experimental_mh - mass);
        let mut found = search_range_with(self.index, window, self.options, |s| {
            linker.group1().accepts(s)
        });
        if !linker.is_symmetric() {
            found.extend(search_range_with(self.index, window, self.options, |s| {
                linker.group2().accepts(s)
            }));
        }
        found
    }

    /// Peptides with both ends of `linker` attached.
    pub fn intralinked(&self, linker: &Linker, experimental_mh: f64) -> Candidates {
        let Some(mass) = linker.intralink_mass() else {
            return Candidates::new();
        };
        let intra = linker.intra_group();
        search_range_with(self.index, self.window(experimental_mh - mass), self.options, |s| {
            intra.accepts(s)
        })
    }

    /// Peptide pairs joined by `linker`.
    ///
    /// Peptide 1 is searched up to the whole target; each hit narrows the
    /// window for peptide 2 to the remaining mass. For symmetric linkers
    /// only the orientation with the lesser candidate first is kept.
    pub fn interlinked(&self, linker: &Linker, experimental_mh: f64) -> Interlinks {
        let mut pairs = Interlinks::new();
        let Some(mass) = linker.interlink_mass() else {
            return pairs;
        };
        let target_m = m_from_mh(experimental_mh) - mass;
        let target = self.window(mh_from_m(target_m));
        let lower_m = m_from_mh(target.lower());
        let upper_m = m_from_mh(target.upper());

        let first = search_range_with(
            self.index,
            MassRange::new(0.0, target.upper()),
            self.options,
            |s| linker.group1().accepts(s),
        );
        for peptide1 in first {
            let p1_m = peptide1.mass.hydrated_mass();
            let remaining = MassRange::new(mh_from_m(lower_m - p1_m), mh_from_m(upper_m - p1_m));
            let mut second = search_range_with(self.index, remaining, self.options, |s| {
                linker.group2().accepts(s)
            });
            if linker.is_symmetric() {
                second.retain(|peptide2| peptide1 <= *peptide2);
            }
            if !second.is_empty() {
                pairs.entry(peptide1).or_default().extend(second);
            }
        }
        pairs
    }

    /// All categories of `linker`.
    pub fn linked(&self, linker: &Linker, experimental_mh: f64) -> LinkedCandidates {
        LinkedCandidates {
            deadend: self.deadend(linker, experimental_mh),
            intralinked: self.intralinked(linker, experimental_mh),
            interlinked: self.interlinked(linker, experimental_mh),
        }
    }

    /// Unlinked candidates plus every category of every linker.
    pub fn candidates(&self, linkers: &[Arc<Linker>], experimental_mh: f64) -> CandidatePeptides {
        CandidatePeptides {
            unlinked: self.unlinked(experimental_mh),
            linked: linkers
                .iter()
                .map(|linker| (Arc::clone(linker), self.linked(linker, experimental_mh)))
                .collect(),
        }
    }
}
