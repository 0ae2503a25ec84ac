use crate::enumerate::{Enumerator, Step};
use crate::sequence::Sequence;

use super::error::DigestError;
use super::rule::CleavageRule;
use super::tolerance::DigestTolerance;

/// Digestion where both ends of every candidate are cleavage sites.
///
/// The sequence is cut after every site into fragments; candidates are runs
/// of adjacent fragments. A run of `n` fragments has `n - 1` missed
/// cleavages. Extension of a run stops as soon as the tolerance reports it
/// too large.
#[derive(Debug, Clone, PartialEq)]
pub struct FullySpecificDigest {
    fragments: Vec<Sequence>,
    tolerance: DigestTolerance,
    start: usize,
    end: usize,
    length: usize,
}

impl FullySpecificDigest {
    /// Cut `sequence` into fragments under `rule`.
    pub fn new(
        sequence: &Sequence,
        rule: &CleavageRule,
        tolerance: DigestTolerance,
    ) -> Result<Self, DigestError> {
        let residues = sequence
            .contiguous()
            .ok_or_else(|| DigestError::NotContiguous(sequence.to_string()))?;
        let total = residues.len();

        let mut fragments = Vec::new();
        let mut previous = 0;
        for site in rule.sites(residues) {
            let cut = site + 1;
            if cut <= previous || cut >= total {
                continue;
            }
            fragments.extend(sequence.view(previous, cut - previous));
            previous = cut;
        }
        if previous < total {
            fragments.extend(sequence.view(previous, total - previous));
        }

        let covered: usize = fragments.iter().map(Sequence::len).sum();
        if covered != total {
            return Err(DigestError::FragmentLengthMismatch {
                sequence: residues.to_string(),
                expected: total,
                actual: covered,
            });
        }

        Ok(Self {
            fragments,
            tolerance,
            start: 0,
            end: 0,
            length: 0,
        })
    }

    /// Fragments between consecutive cleavage sites, in order.
    pub fn fragments(&self) -> &[Sequence] {
        &self.fragments
    }

    fn next_start(&mut self) {
        self.start += 1;
        self.end = self.start;
        self.length = 0;
    }
}

impl Enumerator for FullySpecificDigest {
    type Item = Sequence;

    fn advance(&mut self) -> Step<Sequence> {
        loop {
            if self.start >= self.fragments.len() {
                self.start = 0;
                self.end = 0;
                self.length = 0;
                return Step::Exhausted;
            }
            if self.end >= self.fragments.len() {
                self.next_start();
                continue;
            }

            let missed = self.end - self.start;
            let current = self.end;
            self.length += self.fragments[current].len();
            self.end += 1;

            if self.tolerance.within(self.length, missed) {
                if let Some(run) = Sequence::chain(self.fragments[self.start..=current].to_vec()) {
                    return Step::Produced(run);
                }
            } else if self.tolerance.too_large(self.length, missed) {
                self.next_start();
            }
        }
    }
}
