//! Immutable residue sequences.
//!
//! A protein is loaded once as a [`RootSequence`] and shared through an
//! [`Arc`]. Digestion never copies residues: it produces [`Sequence::View`]
//! sub-ranges and [`Sequence::Chain`] concatenations that keep the root alive
//! for as long as any candidate references them.
//!
//! Sequences compare by root, residues and terminus flags, not by position:
//! the same run of residues cut from two places of one protein is one
//! peptide, and collapses to one candidate.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Residue storage owned by a protein sequence.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RootSequence {
    residues: Box<str>,
    n_terminus: bool,
    c_terminus: bool,
}

impl RootSequence {
    /// Residues as a string slice.
    pub fn as_str(&self) -> &str {
        &self.residues
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Whether the sequence has no residues.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Whether the first residue is a real N-terminus.
    pub fn has_n_terminus(&self) -> bool {
        self.n_terminus
    }

    /// Whether the last residue is a real C-terminus.
    pub fn has_c_terminus(&self) -> bool {
        self.c_terminus
    }
}

/// A read-only run of residues.
///
/// All variants answer the same questions: length, residues, terminus flags
/// and the root they were cut from. Chain parts are never chains themselves.
#[derive(Debug, Clone)]
pub enum Sequence {
    /// A whole protein.
    Root(Arc<RootSequence>),
    /// A contiguous sub-range of a root, `offset` residues from its start.
    View {
        /// Shared residue storage.
        root: Arc<RootSequence>,
        /// Start position within the root.
        offset: usize,
        /// Number of residues.
        len: usize,
    },
    /// Ordered concatenation of views forming one logical sequence.
    ///
    /// Built only through [`Sequence::chain`].
    Chain(SequenceChain),
}

/// Two or more non-chain parts of one logical sequence.
#[derive(Debug, Clone)]
pub struct SequenceChain {
    parts: Vec<Sequence>,
}

impl SequenceChain {
    /// Parts in N- to C-terminal order.
    pub fn parts(&self) -> &[Sequence] {
        &self.parts
    }

    fn first(&self) -> &Sequence {
        // holds at least two parts
        &self.parts[0]
    }
}

impl Sequence {
    /// Create a root sequence with explicit terminus flags.
    ///
    /// Residues are expected to be ASCII one-letter codes.
    pub fn new(residues: impl Into<String>, n_terminus: bool, c_terminus: bool) -> Self {
        let residues: String = residues.into();
        Sequence::Root(Arc::new(RootSequence {
            residues: residues.into_boxed_str(),
            n_terminus,
            c_terminus,
        }))
    }

    /// Create a whole protein: both termini are real.
    pub fn protein(residues: impl Into<String>) -> Self {
        Self::new(residues, true, true)
    }

    /// Concatenate sequences into a chain.
    ///
    /// Nested chains are flattened and a single part is returned unchanged.
    /// Returns `None` for an empty part list.
    pub fn chain(parts: Vec<Sequence>) -> Option<Self> {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Sequence::Chain(chain) => flat.extend(chain.parts),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Sequence::Chain(SequenceChain { parts: flat })),
        }
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        match self {
            Sequence::Root(root) => root.len(),
            Sequence::View { len, .. } => *len,
            Sequence::Chain(chain) => chain.parts.iter().map(Sequence::len).sum(),
        }
    }

    /// Whether the sequence has no residues.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The protein this sequence was cut from.
    pub fn root(&self) -> &Arc<RootSequence> {
        match self {
            Sequence::Root(root) => root,
            Sequence::View { root, .. } => root,
            Sequence::Chain(chain) => chain.first().root(),
        }
    }

    /// Whether the first residue is a real N-terminus of the root.
    pub fn has_n_terminus(&self) -> bool {
        match self {
            Sequence::Root(root) => root.n_terminus,
            Sequence::View { root, offset, .. } => *offset == 0 && root.n_terminus,
            Sequence::Chain(chain) => chain.first().has_n_terminus(),
        }
    }

    /// Whether the last residue is a real C-terminus of the root.
    pub fn has_c_terminus(&self) -> bool {
        match self {
            Sequence::Root(root) => root.c_terminus,
            Sequence::View { root, offset, len } => offset + len == root.len() && root.c_terminus,
            Sequence::Chain(chain) => chain.parts.last().is_some_and(Sequence::has_c_terminus),
        }
    }

    /// Residues as one slice, when they are stored contiguously.
    pub fn contiguous(&self) -> Option<&str> {
        let (offset, len) = self.root_span()?;
        self.root().residues.get(offset..offset + len)
    }

    /// Start and length of this sequence within its root, if contiguous.
    pub fn root_span(&self) -> Option<(usize, usize)> {
        match self {
            Sequence::Root(root) => Some((0, root.len())),
            Sequence::View { offset, len, .. } => Some((*offset, *len)),
            Sequence::Chain(chain) => {
                let root = self.root();
                let (start, mut len) = chain.first().root_span()?;
                for part in &chain.parts[1..] {
                    let (offset, part_len) = part.root_span()?;
                    if !Arc::ptr_eq(root, part.root()) || offset != start + len {
                        return None;
                    }
                    len += part_len;
                }
                Some((start, len))
            }
        }
    }

    /// Stored residue slices in order.
    pub fn segments(&self) -> Segments<'_> {
        match self {
            Sequence::Chain(chain) => Segments {
                single: None,
                parts: chain.parts.iter(),
            },
            other => Segments {
                single: other.contiguous(),
                parts: Default::default(),
            },
        }
    }

    /// Residues in order.
    pub fn residues(&self) -> impl Iterator<Item = char> + '_ {
        self.segments().flat_map(str::chars)
    }

    /// A sub-range of this sequence sharing the same root.
    ///
    /// Returns `None` when the range is out of bounds or the sequence is a
    /// chain whose parts are not adjacent in the root.
    pub fn view(&self, offset: usize, len: usize) -> Option<Sequence> {
        if offset + len > self.len() {
            return None;
        }
        let (start, _) = self.root_span()?;
        Some(Sequence::View {
            root: Arc::clone(self.root()),
            offset: start + offset,
            len,
        })
    }

    /// Count residues accepted by `predicate`.
    pub fn count_residues(&self, mut predicate: impl FnMut(char) -> bool) -> usize {
        self.residues().filter(|&r| predicate(r)).count()
    }
}

/// Iterator over the stored slices of a [`Sequence`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    single: Option<&'a str>,
    parts: std::slice::Iter<'a, Sequence>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if let Some(single) = self.single.take() {
            return Some(single);
        }
        self.parts.by_ref().find_map(Sequence::contiguous)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self.root(), other.root())
            && self.len() == other.len()
            && self.has_n_terminus() == other.has_n_terminus()
            && self.has_c_terminus() == other.has_c_terminus()
            && self.residues().eq(other.residues())
    }
}

impl Eq for Sequence {}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(self.root()) as usize).hash(state);
        self.len().hash(state);
        for residue in self.residues() {
            residue.hash(state);
        }
    }
}

impl Ord for Sequence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.residues()
            .cmp(other.residues())
            .then_with(|| {
                (Arc::as_ptr(self.root()) as usize).cmp(&(Arc::as_ptr(other.root()) as usize))
            })
            .then_with(|| self.has_n_terminus().cmp(&other.has_n_terminus()))
            .then_with(|| self.has_c_terminus().cmp(&other.has_c_terminus()))
    }
}

impl PartialOrd for Sequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
