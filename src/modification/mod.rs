//! Modification combinatorics.
//!
//! Static modifications are always applied: every eligible residue carries
//! one. Dynamic modifications may be applied to anywhere from none to all
//! eligible residues. Both are enumerated in two stages:
//!
//! 1. **Counts**: how many occurrences of each residue carry each
//!    modification symbol ([`ModCountEnumerator`], [`MultiModCountEnumerator`]).
//! 2. **Placements**: which positions carry them ([`ModLocationEnumerator`],
//!    [`MultiModLocationEnumerator`], filtered by [`unique_placements`]).
//!
//! Counts and positions are stored as `i32` so overflow is observable.

mod counts;
mod locations;

use std::collections::{BTreeMap, BTreeSet};

use crate::enumerate::Enumerator;
use crate::sequence::Sequence;

pub use counts::{BoundedModCounts, ModCountEnumerator, MultiModCountEnumerator};
pub use locations::{
    is_disjoint, unique_placements, ModLocationEnumerator, MultiModLocationEnumerator,
    UniquePlacements,
};

/// Count per residue (or per modification symbol).
pub type ResidueCount = BTreeMap<char, i32>;

/// Count per modification symbol.
pub type ModCount = BTreeMap<char, i32>;

/// Modification symbol counts per residue.
pub type ResidueModCount = BTreeMap<char, ModCount>;

/// Modification symbols per residue, or residues per modification symbol.
pub type ResidueMods = BTreeMap<char, BTreeSet<char>>;

/// Positions per modification symbol.
pub type ModLocations = BTreeMap<char, Vec<i32>>;

/// Modification symbol per sequence position.
pub type Placement = BTreeMap<i32, char>;

/// Which residues a set of modifications targets and what each weighs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationTable {
    residue_mods: ResidueMods,
    mod_residues: ResidueMods,
    mod_masses: BTreeMap<char, f64>,
}

impl ModificationTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from residue → symbols and symbol → mass maps.
    pub fn from_maps(residue_mods: ResidueMods, mod_masses: BTreeMap<char, f64>) -> Self {
        let mod_residues = invert(&residue_mods);
        Self {
            residue_mods,
            mod_residues,
            mod_masses,
        }
    }

    /// Add a modification `symbol` of `mass` on `residue`.
    pub fn with_mod(mut self, residue: char, symbol: char, mass: f64) -> Self {
        self.residue_mods.entry(residue).or_default().insert(symbol);
        self.mod_residues.entry(symbol).or_default().insert(residue);
        self.mod_masses.insert(symbol, mass);
        self
    }

    /// Whether no residue carries a modification.
    pub fn is_empty(&self) -> bool {
        self.residue_mods.values().all(BTreeSet::is_empty)
    }

    /// Residue → modification symbols.
    pub fn residue_mods(&self) -> &ResidueMods {
        &self.residue_mods
    }

    /// Modification symbol → residues.
    pub fn mod_residues(&self) -> &ResidueMods {
        &self.mod_residues
    }

    /// Mass of a modification symbol, zero when unknown.
    pub fn mass(&self, symbol: char) -> f64 {
        self.mod_masses.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Total mass of aggregated modification counts.
    pub fn mass_of(&self, counts: &ModCount) -> f64 {
        counts
            .iter()
            .map(|(&symbol, &count)| f64::from(count) * self.mass(symbol))
            .sum()
    }

    /// Occurrences in `sequence` of each residue this table modifies.
    pub fn eligible_counts(&self, sequence: &Sequence) -> ResidueCount {
        let mut counts = ResidueCount::new();
        for residue in sequence.residues() {
            if self.residue_mods.get(&residue).is_some_and(|mods| !mods.is_empty()) {
                *counts.entry(residue).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Swap keys and values of a residue/modification map.
pub fn invert(map: &ResidueMods) -> ResidueMods {
    let mut inverted = ResidueMods::new();
    for (&key, values) in map {
        for &value in values {
            inverted.entry(value).or_default().insert(key);
        }
    }
    inverted
}

/// Sum modification counts over residues.
pub fn aggregate(counts: &ResidueModCount) -> ModCount {
    let mut total = ModCount::new();
    for per_residue in counts.values() {
        for (&symbol, &count) in per_residue {
            *total.entry(symbol).or_insert(0) += count;
        }
    }
    total
}

/// Static placement: every position whose residue has a static modification
/// carries that residue's first modification symbol.
pub fn static_placement(sequence: &Sequence, table: &ModificationTable) -> Placement {
    sequence
        .residues()
        .zip(0i32..)
        .filter_map(|(residue, position)| {
            let symbol = table.residue_mods.get(&residue)?.iter().next()?;
            Some((position, *symbol))
        })
        .collect()
}

/// Every disjoint placement of aggregated dynamic `counts` on `sequence`.
///
/// Produces a single empty placement when no modification has a positive count.
pub fn dynamic_placements(
    sequence: &Sequence,
    counts: &ModCount,
    table: &ModificationTable,
) -> Vec<Placement> {
    if counts.values().all(|&count| count <= 0) {
        return vec![Placement::new()];
    }
    let enumerator = MultiModLocationEnumerator::new(sequence, counts, &table.mod_residues);
    unique_placements(enumerator)
        .into_iter_adapter()
        .map(|locations| to_placement(&locations))
        .collect()
}

/// Flip symbol → positions into position → symbol.
pub fn to_placement(locations: &ModLocations) -> Placement {
    locations
        .iter()
        .flat_map(|(&symbol, positions)| positions.iter().map(move |&position| (position, symbol)))
        .collect()
}

/// Render `sequence` with each placed modification symbol after its residue.
///
/// ```rust
/// use xlsearch::modification::{decorate, Placement};
/// use xlsearch::sequence::Sequence;
///
/// let placement: Placement = [(3, '#')].into_iter().collect();
/// assert_eq!(decorate(&Sequence::protein("PEPCTIDE"), &placement), "PEPC#TIDE");
/// ```
pub fn decorate(sequence: &Sequence, placement: &Placement) -> String {
    let mut decorated = String::with_capacity(sequence.len() + placement.len());
    for (residue, position) in sequence.residues().zip(0i32..) {
        decorated.push(residue);
        if let Some(&symbol) = placement.get(&position) {
            decorated.push(symbol);
        }
    }
    decorated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ModificationTable {
        ModificationTable::new()
            .with_mod('M', '*', 15.9949)
            .with_mod('S', '@', 79.9663)
            .with_mod('T', '@', 79.9663)
    }

    #[test]
    fn test_inverted_map() {
        let table = table();
        let residues: Vec<char> = table.mod_residues()[&'@'].iter().copied().collect();
        assert_eq!(residues, vec!['S', 'T']);
        assert_eq!(invert(table.mod_residues()), *table.residue_mods());
    }

    #[test]
    fn test_eligible_counts() {
        let counts = table().eligible_counts(&Sequence::protein("MSTSKM"));
        assert_eq!(counts, [('M', 2), ('S', 2), ('T', 1)].into_iter().collect());
    }

    #[test]
    fn test_aggregate_and_mass() {
        let per_residue: ResidueModCount = [
            ('S', [('@', 2)].into_iter().collect()),
            ('T', [('@', 1)].into_iter().collect()),
            ('M', [('*', 1)].into_iter().collect()),
        ]
        .into_iter()
        .collect();
        let total = aggregate(&per_residue);
        assert_eq!(total, [('*', 1), ('@', 3)].into_iter().collect());
        let mass = table().mass_of(&total);
        assert!((mass - (15.9949 + 3.0 * 79.9663)).abs() < 1e-9);
    }

    #[test]
    fn test_static_placement() {
        let table = ModificationTable::new().with_mod('C', '#', 57.0215);
        let sequence = Sequence::protein("ACDCE");
        let placement = static_placement(&sequence, &table);
        assert_eq!(placement, [(1, '#'), (3, '#')].into_iter().collect());
        assert_eq!(decorate(&sequence, &placement), "AC#DC#E");
    }

    #[test]
    fn test_dynamic_placements() {
        let sequence = Sequence::protein("MSM");
        let counts: ModCount = [('*', 1)].into_iter().collect();
        let placements = dynamic_placements(&sequence, &counts, &table());
        assert_eq!(placements.len(), 2);
        assert_eq!(decorate(&sequence, &placements[0]), "M*SM");
        assert_eq!(decorate(&sequence, &placements[1]), "MSM*");
        assert_eq!(
            dynamic_placements(&sequence, &ModCount::new(), &table()),
            vec![Placement::new()]
        );
    }
}
