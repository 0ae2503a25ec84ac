//! Property-based tests for digestion, modification enumeration and the mass index.

use std::collections::BTreeSet;

use proptest::prelude::*;
use xlsearch::digest::{digest, CleavageRule, DigestMode, DigestTolerance, FullySpecificDigest};
use xlsearch::enumerate::Enumerator;
use xlsearch::index::{search_range, Candidate, Candidates, MassIndex, MassRange, SearchTolerance};
use xlsearch::mass::{m_from_mh, m_from_mz, mh_from_m, mz_from_m};
use xlsearch::mass_gen::{SequenceMassGenerator, SequenceOptions};
use xlsearch::modification::{dynamic_placements, ModCount, ModificationTable};
use xlsearch::sequence::Sequence;

fn trypsin() -> CleavageRule {
    CleavageRule::builtin("trypsin").unwrap()
}

fn sorted_strings(peptides: &[Sequence]) -> Vec<String> {
    let mut strings: Vec<String> = peptides.iter().map(|p| p.to_string()).collect();
    strings.sort();
    strings
}

/// Every run of cleavage fragments the tolerance accepts.
fn brute_force_full(residues: &str, tolerance: DigestTolerance) -> Vec<String> {
    let total = residues.len();
    let mut cuts: BTreeSet<usize> = trypsin()
        .sites(residues)
        .into_iter()
        .map(|site| site + 1)
        .filter(|&cut| cut < total)
        .collect();
    cuts.insert(0);
    cuts.insert(total);
    let cuts: Vec<usize> = cuts.into_iter().collect();

    let mut peptides = Vec::new();
    for i in 0..cuts.len() {
        for j in i + 1..cuts.len() {
            let (start, end) = (cuts[i], cuts[j]);
            if tolerance.within(end - start, j - i - 1) {
                peptides.push(residues[start..end].to_string());
            }
        }
    }
    peptides.sort();
    peptides
}

/// Every substring with exactly `trypticity` specific ends.
fn brute_force_specific(residues: &str, tolerance: DigestTolerance, trypticity: u8) -> Vec<String> {
    let sites = trypsin().sites(residues);
    let total = residues.len();
    let mut peptides = Vec::new();
    for first in 0..total {
        for last in first..total {
            let first_specific = first == 0 || sites.contains(&(first - 1));
            let last_specific = last + 1 == total || sites.contains(&last);
            let specific = u8::from(first_specific) + u8::from(last_specific);
            let missed = sites.iter().filter(|&&s| s >= first && s < last).count();
            if specific == trypticity && tolerance.within(last + 1 - first, missed) {
                peptides.push(residues[first..=last].to_string());
            }
        }
    }
    peptides.sort();
    peptides
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

fn modified_options() -> SequenceOptions {
    SequenceOptions {
        static_mods: ModificationTable::new().with_mod('C', '#', 57.02146),
        dynamic_mods: ModificationTable::new().with_mod('M', '*', 15.9949),
        ..SequenceOptions::default()
    }
}

fn brute_force_search(peptides: &[Sequence], range: MassRange, options: &SequenceOptions) -> Candidates {
    let range = range.clamped();
    peptides
        .iter()
        .flat_map(|peptide| {
            SequenceMassGenerator::new(peptide, options)
                .into_iter_adapter()
                .filter(move |mass| range.contains(mass.mh))
                .map(move |mass| Candidate {
                    sequence: peptide.clone(),
                    mass,
                })
        })
        .collect()
}

proptest! {
    /// Cleavage fragments partition the protein
    #[test]
    fn test_fragments_cover_protein(residues in "[ACDEGKMPR]{1,60}") {
        let protein = Sequence::protein(residues.as_str());
        let digestion = FullySpecificDigest::new(&protein, &trypsin(), DigestTolerance::default()).unwrap();
        let joined: String = digestion.fragments().iter().map(|f| f.to_string()).collect();
        prop_assert_eq!(joined, residues);
    }

    /// Allowing more missed cleavages never drops a peptide
    #[test]
    fn test_missed_cleavages_are_monotone(
        residues in "[ACDEGKMPR]{1,40}",
        missed in 0usize..4,
        extra in 1usize..3,
        mode in prop_oneof![Just(DigestMode::Full), Just(DigestMode::Partial), Just(DigestMode::None)],
    ) {
        let protein = Sequence::protein(residues.as_str());
        let fewer = digest(&protein, &trypsin(), mode, DigestTolerance::new(1, 20, missed)).unwrap();
        let more = digest(&protein, &trypsin(), mode, DigestTolerance::new(1, 20, missed + extra)).unwrap();
        let more: BTreeSet<String> = sorted_strings(&more).into_iter().collect();
        prop_assert!(sorted_strings(&fewer).iter().all(|p| more.contains(p)));
    }

    /// Full digestion yields exactly the accepted runs of fragments
    #[test]
    fn test_full_digestion_is_complete(
        residues in "[ACDEGKMPR]{1,40}",
        min_length in 1usize..8,
        max_length in 1usize..20,
        missed in 0usize..4,
    ) {
        let tolerance = DigestTolerance::new(min_length, max_length, missed);
        let peptides = digest(&Sequence::protein(residues.as_str()), &trypsin(), DigestMode::Full, tolerance).unwrap();
        prop_assert_eq!(sorted_strings(&peptides), brute_force_full(&residues, tolerance));
    }

    /// Semi- and non-specific digestion yield exactly the substrings with that many specific ends
    #[test]
    fn test_specific_digestion_is_complete(
        residues in "[ACGKPR]{1,25}",
        max_length in 2usize..12,
        missed in 1usize..4,
        mode in prop_oneof![Just(DigestMode::Partial), Just(DigestMode::None)],
    ) {
        let tolerance = DigestTolerance::new(1, max_length, missed);
        let peptides = digest(&Sequence::protein(residues.as_str()), &trypsin(), mode, tolerance).unwrap();
        prop_assert_eq!(
            sorted_strings(&peptides),
            brute_force_specific(&residues, tolerance, mode.trypticity())
        );
    }

    /// Static counts are exact and dynamic counts range over every eligible residue count
    #[test]
    fn test_mod_counts_are_bounded(residues in "[ACGKM]{1,12}") {
        let options = modified_options();
        let peptide = Sequence::protein(residues.as_str());
        let cysteines = residues.matches('C').count() as i32;
        let methionines = residues.matches('M').count() as i32;

        let configurations: Vec<_> = SequenceMassGenerator::new(&peptide, &options)
            .into_iter_adapter()
            .collect();
        prop_assert_eq!(configurations.len(), methionines as usize + 1);

        let mut dynamic = BTreeSet::new();
        for configuration in &configurations {
            prop_assert_eq!(configuration.static_mods.get(&'#').copied().unwrap_or(0), cysteines);
            let count = configuration.dynamic_mods.get(&'*').copied().unwrap_or(0);
            prop_assert!((0..=methionines).contains(&count));
            dynamic.insert(count);
        }
        prop_assert_eq!(dynamic.len(), configurations.len());
    }

    /// Placements of k modifications are distinct and number C(n, k)
    #[test]
    fn test_placements_are_unique(residues in "[ACGKM]{1,12}", k in 0i32..5) {
        let table = ModificationTable::new().with_mod('M', '*', 15.9949);
        let peptide = Sequence::protein(residues.as_str());
        let eligible: Vec<i32> = residues
            .chars()
            .zip(0i32..)
            .filter(|(residue, _)| *residue == 'M')
            .map(|(_, position)| position)
            .collect();
        let counts: ModCount = [('*', k)].into_iter().collect();

        let placements = dynamic_placements(&peptide, &counts, &table);
        prop_assert_eq!(placements.len(), binomial(eligible.len(), k as usize));
        let distinct: BTreeSet<_> = placements.iter().cloned().collect();
        prop_assert_eq!(distinct.len(), placements.len());
        for placement in &placements {
            prop_assert_eq!(placement.len(), k as usize);
            prop_assert!(placement.keys().all(|position| eligible.contains(position)));
        }
    }

    /// Index lookups agree with weighing every peptide directly
    #[test]
    fn test_index_matches_brute_force(
        peptides in prop::collection::vec("[ACGKMR]{1,10}", 0..20),
        center in 100.0f64..1500.0,
        width in 0.0f64..200.0,
    ) {
        let options = modified_options();
        let peptides: Vec<Sequence> = peptides
            .iter()
            .map(|residues| Sequence::new(residues.as_str(), false, false))
            .collect();
        let index = MassIndex::build(peptides.clone(), &options);
        let range = MassRange::new(center - width, center + width);
        prop_assert_eq!(
            search_range(&index, range, &options),
            brute_force_search(&peptides, range, &options)
        );
    }

    /// Widening the tolerance never loses candidates
    #[test]
    fn test_wider_tolerance_is_superset(
        peptides in prop::collection::vec("[ACGKMR]{2,10}", 1..15),
        center in 200.0f64..1200.0,
        narrow in 0.0f64..500.0,
        extra in 0.0f64..500.0,
    ) {
        let options = modified_options();
        let index = MassIndex::build(
            peptides.iter().map(|residues| Sequence::new(residues.as_str(), false, false)),
            &options,
        );
        let search = |ppm: f64| {
            xlsearch::index::peptide_search(&index, center, &options, SearchTolerance::Ppm(ppm))
        };
        let small = search(narrow);
        let large = search(narrow + extra);
        prop_assert!(small.is_subset(&large));
    }

    /// Mh and m/z conversions invert each other
    #[test]
    fn test_mass_conversions_round_trip(m in 0.0f64..100_000.0, charge in 1u32..8) {
        prop_assert!((m_from_mh(mh_from_m(m)) - m).abs() < 1e-9);
        prop_assert!((m_from_mz(mz_from_m(m, charge), charge) - m).abs() < 1e-7);
    }
}
