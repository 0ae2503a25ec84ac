//! Residues and termini one end of a linker binds to.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Add;

use crate::sequence::Sequence;

/// The binding specificity of one linker end.
///
/// A terminus counts as a site only when the sequence actually carries that
/// terminus of its protein.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReactionGroup {
    targets: BTreeSet<char>,
    binds_n_terminus: bool,
    binds_c_terminus: bool,
}

impl ReactionGroup {
    /// A group binding `targets` and optionally the protein termini.
    pub fn new(
        targets: impl IntoIterator<Item = char>,
        binds_n_terminus: bool,
        binds_c_terminus: bool,
    ) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            binds_n_terminus,
            binds_c_terminus,
        }
    }

    /// Lysine plus the protein N-terminus (primary amines).
    pub fn nh2() -> Self {
        Self::new(['K'], true, false)
    }

    /// Lysine only.
    pub fn lys() -> Self {
        Self::new(['K'], false, false)
    }

    /// Aspartate and glutamate side chains.
    pub fn carboxyl() -> Self {
        Self::new(['D', 'E'], false, false)
    }

    /// Cysteine only.
    pub fn cys() -> Self {
        Self::new(['C'], false, false)
    }

    /// Residues this group binds.
    pub fn targets(&self) -> &BTreeSet<char> {
        &self.targets
    }

    /// Whether the group binds a protein N-terminus.
    pub fn binds_n_terminus(&self) -> bool {
        self.binds_n_terminus
    }

    /// Whether the group binds a protein C-terminus.
    pub fn binds_c_terminus(&self) -> bool {
        self.binds_c_terminus
    }

    /// Whether the group binds `residue`.
    pub fn binds(&self, residue: char) -> bool {
        self.targets.contains(&residue)
    }

    /// Number of places on `sequence` this group can bind.
    pub fn reaction_sites(&self, sequence: &Sequence) -> i32 {
        let mut sites = 0;
        for residue in sequence.residues() {
            if self.binds(residue) {
                sites += 1;
            }
        }
        if self.binds_n_terminus && sequence.has_n_terminus() {
            sites += 1;
        }
        if self.binds_c_terminus && sequence.has_c_terminus() {
            sites += 1;
        }
        sites
    }

    /// Whether this group can bind `sequence` at all.
    pub fn accepts(&self, sequence: &Sequence) -> bool {
        self.reaction_sites(sequence) >= 1
    }

    /// Sites bound by both groups.
    pub fn intersection(&self, other: &ReactionGroup) -> ReactionGroup {
        ReactionGroup {
            targets: self.targets.intersection(&other.targets).copied().collect(),
            binds_n_terminus: self.binds_n_terminus && other.binds_n_terminus,
            binds_c_terminus: self.binds_c_terminus && other.binds_c_terminus,
        }
    }
}

impl Add for &ReactionGroup {
    type Output = ReactionGroup;

    fn add(self, other: &ReactionGroup) -> ReactionGroup {
        ReactionGroup {
            targets: self.targets.union(&other.targets).copied().collect(),
            binds_n_terminus: self.binds_n_terminus || other.binds_n_terminus,
            binds_c_terminus: self.binds_c_terminus || other.binds_c_terminus,
        }
    }
}

impl fmt::Display for ReactionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let residues: String = self.targets.iter().collect();
        write!(f, "[{residues}]")?;
        if self.binds_n_terminus {
            write!(f, "+N-term")?;
        }
        if self.binds_c_terminus {
            write!(f, "+C-term")?;
        }
        Ok(())
    }
}

/// Both ends of one linker closing on the same peptide.
///
/// With `g1` and `g2` the site counts of each group and `s` the count of
/// sites both groups bind, a peptide qualifies when `g1 > 0` and group 2 still
/// has a free site after group 1 took one. Group 1 is forced onto a shared
/// site only when every one of its sites is shared (`g1 == s`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntraReactionGroup {
    group1: ReactionGroup,
    group2: ReactionGroup,
    shared: ReactionGroup,
}

impl IntraReactionGroup {
    /// Combine the two ends of a linker.
    pub fn new(group1: &ReactionGroup, group2: &ReactionGroup) -> Self {
        Self {
            group1: group1.clone(),
            group2: group2.clone(),
            shared: group1.intersection(group2),
        }
    }

    /// Sites both ends can bind.
    pub fn shared(&self) -> &ReactionGroup {
        &self.shared
    }

    /// Whether both ends can bind distinct sites of `sequence`.
    pub fn accepts(&self, sequence: &Sequence) -> bool {
        let group1 = self.group1.reaction_sites(sequence);
        if group1 <= 0 {
            return false;
        }
        let mut group2 = self.group2.reaction_sites(sequence);
        if group1 == self.shared.reaction_sites(sequence) {
            group2 -= 1;
        }
        group2 > 0
    }
}
