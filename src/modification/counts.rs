use crate::enumerate::{Enumerator, Odometer, Step};

use super::{ModCount, ResidueCount, ResidueModCount, ResidueMods};

/// Every assignment of `0..=bound` to each key, first key fastest.
///
/// The all-zero assignment comes first. Zero counts are left out of the
/// produced map, so the first value is always empty. With no keys a single
/// empty assignment is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModCountEnumerator {
    bounds: Vec<(char, i32)>,
    counts: Vec<i32>,
    started: bool,
}

impl ModCountEnumerator {
    /// Enumerate counts up to the given per-key bounds. Non-positive bounds are
    /// dropped.
    pub fn new(bounds: &ResidueCount) -> Self {
        let bounds: Vec<(char, i32)> = bounds
            .iter()
            .filter(|(_, &bound)| bound > 0)
            .map(|(&key, &bound)| (key, bound))
            .collect();
        let counts = vec![0; bounds.len()];
        Self {
            bounds,
            counts,
            started: false,
        }
    }

    fn output(&self) -> ModCount {
        self.bounds
            .iter()
            .zip(&self.counts)
            .filter(|(_, &count)| count > 0)
            .map(|(&(key, _), &count)| (key, count))
            .collect()
    }
}

impl Enumerator for ModCountEnumerator {
    type Item = ModCount;

    fn advance(&mut self) -> Step<ModCount> {
        if !self.started {
            self.started = true;
            return Step::Produced(self.output());
        }
        for (count, &(_, bound)) in self.counts.iter_mut().zip(&self.bounds) {
            if *count < bound {
                *count += 1;
                return Step::Produced(self.output());
            }
            *count = 0;
        }
        self.started = false;
        Step::Exhausted
    }
}

/// Counts for the modifications of one residue whose total lies in
/// `lower..=upper`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedModCounts {
    residue: char,
    lower: i32,
    upper: i32,
    counts: ModCountEnumerator,
}

impl BoundedModCounts {
    /// Distribute between `lower` and `upper` occurrences of `residue` over
    /// the modification symbols in `mods`.
    pub fn new(
        residue: char,
        mods: impl IntoIterator<Item = char>,
        lower: i32,
        upper: i32,
    ) -> Self {
        let bounds: ResidueCount = mods.into_iter().map(|symbol| (symbol, upper)).collect();
        Self {
            residue,
            lower,
            upper,
            counts: ModCountEnumerator::new(&bounds),
        }
    }

    /// Residue these counts apply to.
    pub fn residue(&self) -> char {
        self.residue
    }
}

impl Enumerator for BoundedModCounts {
    type Item = ModCount;

    fn advance(&mut self) -> Step<ModCount> {
        loop {
            match self.counts.advance() {
                Step::Produced(counts) => {
                    let total: i32 = counts.values().sum();
                    if total >= self.lower && total <= self.upper {
                        return Step::Produced(counts);
                    }
                }
                Step::Exhausted => return Step::Exhausted,
            }
        }
    }
}

/// Modification counts per residue across every modifiable residue.
///
/// For each residue with a positive upper bound and at least one modification
/// symbol, the counts of its symbols are distributed so their total lies in
/// `lower[residue]..=upper[residue]` (a missing lower bound is zero). Residues
/// are combined as an odometer in residue order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiModCountEnumerator {
    residues: Vec<char>,
    odometer: Odometer<BoundedModCounts>,
}

impl MultiModCountEnumerator {
    /// Enumerate counts bounded per residue.
    pub fn new(residue_mods: &ResidueMods, upper: &ResidueCount, lower: &ResidueCount) -> Self {
        let wheels: Vec<BoundedModCounts> = upper
            .iter()
            .filter(|(_, &bound)| bound > 0)
            .filter_map(|(&residue, &bound)| {
                let mods = residue_mods.get(&residue).filter(|mods| !mods.is_empty())?;
                let floor = lower.get(&residue).copied().unwrap_or(0);
                Some(BoundedModCounts::new(residue, mods.iter().copied(), floor, bound))
            })
            .collect();
        Self {
            residues: wheels.iter().map(BoundedModCounts::residue).collect(),
            odometer: Odometer::new(wheels),
        }
    }

    /// Static modifications: every eligible residue is modified.
    pub fn exact(residue_mods: &ResidueMods, eligible: &ResidueCount) -> Self {
        Self::new(residue_mods, eligible, eligible)
    }

    /// Dynamic modifications: anywhere from none to all eligible residues.
    pub fn up_to(residue_mods: &ResidueMods, eligible: &ResidueCount) -> Self {
        Self::new(residue_mods, eligible, &ResidueCount::new())
    }
}

impl Enumerator for MultiModCountEnumerator {
    type Item = ResidueModCount;

    fn advance(&mut self) -> Step<ResidueModCount> {
        match self.odometer.advance() {
            Step::Produced(per_residue) => Step::Produced(
                self.residues
                    .iter()
                    .copied()
                    .zip(per_residue)
                    .filter(|(_, counts)| !counts.is_empty())
                    .collect(),
            ),
            Step::Exhausted => Step::Exhausted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn counts(pairs: &[(char, i32)]) -> ResidueCount {
        pairs.iter().copied().collect()
    }

    fn mods(pairs: &[(char, &str)]) -> ResidueMods {
        pairs
            .iter()
            .map(|&(residue, symbols)| (residue, symbols.chars().collect::<BTreeSet<char>>()))
            .collect()
    }

    #[test]
    fn test_count_odometer_order() {
        let all: Vec<ModCount> = ModCountEnumerator::new(&counts(&[('K', 1), ('M', 2)]))
            .into_iter_adapter()
            .collect();
        assert_eq!(
            all,
            vec![
                counts(&[]),
                counts(&[('K', 1)]),
                counts(&[('M', 1)]),
                counts(&[('K', 1), ('M', 1)]),
                counts(&[('M', 2)]),
                counts(&[('K', 1), ('M', 2)]),
            ]
        );
    }

    #[test]
    fn test_count_without_keys_produces_empty_once() {
        let all: Vec<ModCount> = ModCountEnumerator::new(&counts(&[('K', 0)]))
            .into_iter_adapter()
            .collect();
        assert_eq!(all, vec![ModCount::new()]);
    }

    #[test]
    fn test_exact_static_counts() {
        let residue_mods = mods(&[('C', "#")]);
        let all: Vec<ResidueModCount> =
            MultiModCountEnumerator::exact(&residue_mods, &counts(&[('C', 2)]))
                .into_iter_adapter()
                .collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0][&'C'], counts(&[('#', 2)]));
    }

    #[test]
    fn test_dynamic_counts_split_between_symbols() {
        let residue_mods = mods(&[('S', "*@")]);
        let all: Vec<ResidueModCount> =
            MultiModCountEnumerator::up_to(&residue_mods, &counts(&[('S', 1)]))
                .into_iter_adapter()
                .collect();
        // none, one '*', one '@'
        assert_eq!(all.len(), 3);
        assert!(all[0].is_empty());
        assert_eq!(all[1][&'S'], counts(&[('*', 1)]));
        assert_eq!(all[2][&'S'], counts(&[('@', 1)]));
    }

    #[test]
    fn test_residues_without_mods_are_ignored() {
        let residue_mods = mods(&[('M', "*")]);
        let all: Vec<ResidueModCount> =
            MultiModCountEnumerator::up_to(&residue_mods, &counts(&[('K', 3), ('M', 1)]))
                .into_iter_adapter()
                .collect();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|config| !config.contains_key(&'K')));
    }

    #[test]
    fn test_unreachable_lower_bound_is_empty() {
        let residue_mods = mods(&[('K', "^")]);
        let enumerator = MultiModCountEnumerator::new(
            &residue_mods,
            &counts(&[('K', 1)]),
            &counts(&[('K', 2)]),
        );
        assert_eq!(enumerator.into_iter_adapter().count(), 0);
    }
}
