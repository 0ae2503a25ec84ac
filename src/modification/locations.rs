use std::collections::BTreeSet;

use crate::enumerate::{Enumerator, Filtered, Odometer, Step};
use crate::sequence::Sequence;

use super::{ModCount, ModLocations, ResidueMods};

/// Every `k`-subset of a set of positions, in lexicographic order.
///
/// Produces nothing when `k` is not positive, when there are no positions or
/// when `k` exceeds the number of positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModLocationEnumerator {
    positions: Vec<i32>,
    k: i32,
    chosen: Vec<usize>,
}

impl ModLocationEnumerator {
    /// Choose `k` of `positions`.
    pub fn new(positions: Vec<i32>, k: i32) -> Self {
        Self {
            positions,
            k,
            chosen: Vec::new(),
        }
    }

    /// Choose `k` of the positions of `sequence` holding one of `residues`.
    pub fn for_residues(sequence: &Sequence, residues: &BTreeSet<char>, k: i32) -> Self {
        let positions = sequence
            .residues()
            .zip(0i32..)
            .filter(|(residue, _)| residues.contains(residue))
            .map(|(_, position)| position)
            .collect();
        Self::new(positions, k)
    }

    /// Candidate positions.
    pub fn positions(&self) -> &[i32] {
        &self.positions
    }

    fn selection(&self) -> Vec<i32> {
        self.chosen.iter().map(|&index| self.positions[index]).collect()
    }
}

impl Enumerator for ModLocationEnumerator {
    type Item = Vec<i32>;

    fn advance(&mut self) -> Step<Vec<i32>> {
        let n = self.positions.len();
        let k = match usize::try_from(self.k) {
            Ok(k) if k > 0 && k <= n => k,
            _ => return Step::Exhausted,
        };

        if self.chosen.is_empty() {
            self.chosen = (0..k).collect();
            return Step::Produced(self.selection());
        }

        for slot in (0..k).rev() {
            if self.chosen[slot] < n - k + slot {
                self.chosen[slot] += 1;
                for next in slot + 1..k {
                    self.chosen[next] = self.chosen[next - 1] + 1;
                }
                return Step::Produced(self.selection());
            }
        }
        self.chosen.clear();
        Step::Exhausted
    }
}

/// Placements of several modifications at once.
///
/// One [`ModLocationEnumerator`] per modification symbol with a positive
/// count, combined as an odometer in symbol order. Placements may overlap;
/// wrap with [`unique_placements`] to reject those.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiModLocationEnumerator {
    symbols: Vec<char>,
    odometer: Odometer<ModLocationEnumerator>,
}

impl MultiModLocationEnumerator {
    /// Place `counts` (modification symbol → count) on `sequence`.
    ///
    /// `mod_residues` maps each modification symbol to the residues it may sit on.
    pub fn new(sequence: &Sequence, counts: &ModCount, mod_residues: &ResidueMods) -> Self {
        let empty = BTreeSet::new();
        let (symbols, wheels): (Vec<char>, Vec<ModLocationEnumerator>) = counts
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&symbol, &count)| {
                let residues = mod_residues.get(&symbol).unwrap_or(&empty);
                (
                    symbol,
                    ModLocationEnumerator::for_residues(sequence, residues, count),
                )
            })
            .unzip();
        Self {
            symbols,
            odometer: Odometer::new(wheels),
        }
    }
}

impl Enumerator for MultiModLocationEnumerator {
    type Item = ModLocations;

    fn advance(&mut self) -> Step<ModLocations> {
        match self.odometer.advance() {
            Step::Produced(per_symbol) => {
                Step::Produced(self.symbols.iter().copied().zip(per_symbol).collect())
            }
            Step::Exhausted => Step::Exhausted,
        }
    }
}

/// Whether no position is claimed by two modifications.
pub fn is_disjoint(locations: &ModLocations) -> bool {
    let mut seen = BTreeSet::new();
    locations
        .values()
        .flatten()
        .all(|position| seen.insert(*position))
}

/// Placements in which every position carries at most one modification.
pub type UniquePlacements = Filtered<MultiModLocationEnumerator, fn(&ModLocations) -> bool>;

/// Wrap `enumerator` so overlapping placements are skipped.
pub fn unique_placements(enumerator: MultiModLocationEnumerator) -> UniquePlacements {
    enumerator.filtered(is_disjoint as fn(&ModLocations) -> bool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(pairs: &[(char, &str)]) -> ResidueMods {
        pairs
            .iter()
            .map(|&(symbol, residues)| (symbol, residues.chars().collect()))
            .collect()
    }

    #[test]
    fn test_combinations_lexicographic() {
        let all: Vec<Vec<i32>> = ModLocationEnumerator::new(vec![1, 4, 6, 9], 2)
            .into_iter_adapter()
            .collect();
        assert_eq!(
            all,
            vec![
                vec![1, 4],
                vec![1, 6],
                vec![1, 9],
                vec![4, 6],
                vec![4, 9],
                vec![6, 9]
            ]
        );
    }

    #[test]
    fn test_degenerate_choices_are_empty() {
        assert_eq!(ModLocationEnumerator::new(vec![1, 2], 0).into_iter_adapter().count(), 0);
        assert_eq!(ModLocationEnumerator::new(vec![], 1).into_iter_adapter().count(), 0);
        assert_eq!(ModLocationEnumerator::new(vec![3], 2).into_iter_adapter().count(), 0);
        assert_eq!(ModLocationEnumerator::new(vec![3], -1).into_iter_adapter().count(), 0);
    }

    #[test]
    fn test_choose_all() {
        let all: Vec<Vec<i32>> = ModLocationEnumerator::new(vec![2, 5, 7], 3)
            .into_iter_adapter()
            .collect();
        assert_eq!(all, vec![vec![2, 5, 7]]);
    }

    #[test]
    fn test_positions_from_residues() {
        let sequence = Sequence::protein("MSTSKS");
        let residues: BTreeSet<char> = "ST".chars().collect();
        let locations = ModLocationEnumerator::for_residues(&sequence, &residues, 1);
        assert_eq!(locations.positions(), &[1, 2, 3, 5]);
    }

    #[test]
    fn test_overlapping_placements_are_rejected() {
        let sequence = Sequence::protein("AKSK");
        let counts: ModCount = [('*', 1), ('^', 1)].into_iter().collect();
        let mod_residues = mods(&[('*', "KS"), ('^', "K")]);

        let raw = MultiModLocationEnumerator::new(&sequence, &counts, &mod_residues);
        assert_eq!(raw.clone().into_iter_adapter().count(), 6);

        let unique: Vec<ModLocations> = unique_placements(raw).into_iter_adapter().collect();
        assert_eq!(unique.len(), 4);
        assert!(unique.iter().all(is_disjoint));
    }

    #[test]
    fn test_no_counts_yields_one_empty_placement() {
        let sequence = Sequence::protein("PEPTIDE");
        let all: Vec<ModLocations> =
            MultiModLocationEnumerator::new(&sequence, &ModCount::new(), &ResidueMods::new())
                .into_iter_adapter()
                .collect();
        assert_eq!(all, vec![ModLocations::new()]);
    }
}
