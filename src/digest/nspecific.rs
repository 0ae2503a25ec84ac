use crate::enumerate::{Enumerator, Step};
use crate::sequence::Sequence;

use super::error::DigestError;
use super::rule::CleavageRule;
use super::tolerance::DigestTolerance;

/// Digestion where exactly `trypticity` ends of a candidate (0, 1 or 2) fall
/// on a cleavage site.
///
/// A sequence end counts as a site only when the parent sequence carries the
/// matching real terminus. Missed cleavages count the sites passed over
/// inside the candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct NSpecificDigest {
    sequence: Sequence,
    sites: Vec<usize>,
    trypticity: u8,
    tolerance: DigestTolerance,
    first: usize,
    length: usize,
    missed: usize,
}

impl NSpecificDigest {
    /// Prepare a digestion of `sequence` requiring `trypticity` specific ends.
    pub fn new(
        sequence: &Sequence,
        rule: &CleavageRule,
        tolerance: DigestTolerance,
        trypticity: u8,
    ) -> Result<Self, DigestError> {
        let residues = sequence
            .contiguous()
            .ok_or_else(|| DigestError::NotContiguous(sequence.to_string()))?;
        let sites = rule.sites(residues);
        Ok(Self {
            sequence: sequence.clone(),
            sites,
            trypticity,
            tolerance,
            first: 0,
            length: 0,
            missed: 0,
        })
    }

    /// Number of specific ends required.
    pub fn trypticity(&self) -> u8 {
        self.trypticity
    }

    fn is_site(&self, position: usize) -> bool {
        self.sites.binary_search(&position).is_ok()
    }

    fn first_is_specific(&self, first: usize) -> bool {
        if first == 0 {
            self.sequence.has_n_terminus()
        } else {
            self.is_site(first - 1)
        }
    }

    /// The final residue is specific only through a real C-terminus, even
    /// when the protease would cut after it.
    fn last_is_specific(&self, last: usize) -> bool {
        if last + 1 == self.sequence.len() {
            self.sequence.has_c_terminus()
        } else {
            self.is_site(last)
        }
    }

    fn next_first(&mut self) {
        self.first += 1;
        self.length = 0;
        self.missed = 0;
    }
}

impl Enumerator for NSpecificDigest {
    type Item = Sequence;

    fn advance(&mut self) -> Step<Sequence> {
        let total = self.sequence.len();
        loop {
            if self.first >= total {
                self.first = 0;
                self.length = 0;
                self.missed = 0;
                return Step::Exhausted;
            }
            if self.first + self.length >= total {
                self.next_first();
                continue;
            }

            let last = self.first + self.length;
            self.length += 1;
            let missed = self.missed;
            let last_specific = self.last_is_specific(last);
            if last_specific {
                self.missed += 1;
            }

            let specific =
                u8::from(self.first_is_specific(self.first)) + u8::from(last_specific);
            if specific == self.trypticity && self.tolerance.within(self.length, missed) {
                if let Some(peptide) = self.sequence.view(self.first, self.length) {
                    return Step::Produced(peptide);
                }
            } else if self.tolerance.too_large(self.length, missed) {
                self.next_first();
            }
        }
    }
}
