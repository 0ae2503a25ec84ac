//! Mass-indexed peptide lookup.
//!
//! Each digested peptide is stored once under the interval spanning the
//! lowest to highest Mh any of its modification configurations can reach,
//! padded by [`INTERVAL_THRESHOLD`]. The index is immutable after
//! construction and is shared by reference between search threads.
//!
//! A query is a broad phase: it returns every peptide whose interval
//! intersects the padded window. [`search_range`] then re-derives the exact masses
//! and keeps only configurations inside the window.

mod range;
mod search;

use crate::mass_gen::{mass_bounds, SequenceOptions};
use crate::sequence::Sequence;

pub use range::{MassRange, SearchTolerance, INTERVAL_THRESHOLD};
pub use search::{peptide_search, search_range, search_range_with, Candidate, Candidates};

/// One peptide and its padded Mh interval.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    lower: f64,
    upper: f64,
    sequence: Sequence,
}

impl IndexEntry {
    /// Weigh every configuration of `sequence` and pad the resulting interval.
    ///
    /// Returns `None` when the sequence has no configuration at all.
    pub fn from_sequence(sequence: Sequence, options: &SequenceOptions) -> Option<Self> {
        let (low, high) = mass_bounds(&sequence, options)?;
        Some(Self {
            lower: low - INTERVAL_THRESHOLD,
            upper: high + INTERVAL_THRESHOLD,
            sequence,
        })
    }

    /// Lower edge of the padded interval.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper edge of the padded interval.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// The indexed peptide.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    fn intersects(&self, low: f64, high: f64) -> bool {
        self.lower <= high && self.upper >= low
    }
}

/// Interval index over peptide mass ranges.
///
/// Entries are sorted by lower edge; a running maximum of upper edges bounds
/// the scan from below.
#[derive(Debug, Clone, Default)]
pub struct MassIndex {
    entries: Vec<IndexEntry>,
    max_upper: Vec<f64>,
}

impl MassIndex {
    /// An index with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from precomputed entries.
    pub fn from_entries(mut entries: Vec<IndexEntry>) -> Self {
        entries.sort_by(|a, b| a.lower.total_cmp(&b.lower));
        let mut running = f64::NEG_INFINITY;
        let max_upper = entries
            .iter()
            .map(|entry| {
                running = running.max(entry.upper);
                running
            })
            .collect();
        Self { entries, max_upper }
    }

    /// Index every sequence under `options`.
    pub fn build(sequences: impl IntoIterator<Item = Sequence>, options: &SequenceOptions) -> Self {
        Self::from_entries(
            sequences
                .into_iter()
                .filter_map(|sequence| IndexEntry::from_sequence(sequence, options))
                .collect(),
        )
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by lower edge.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Entries whose interval intersects `[low, high]`.
    pub fn intersecting(&self, low: f64, high: f64) -> impl Iterator<Item = &IndexEntry> + '_ {
        let end = self.entries.partition_point(|entry| entry.lower <= high);
        let start = self.max_upper[..end].partition_point(|&upper| upper < low);
        self.entries[start..end]
            .iter()
            .filter(move |entry| entry.intersects(low, high))
    }

    /// Entries whose interval intersects the padded `range`.
    pub fn query(&self, range: &MassRange) -> impl Iterator<Item = &IndexEntry> + '_ {
        let (low, high) = range.to_box();
        self.intersecting(low, high)
    }
}
