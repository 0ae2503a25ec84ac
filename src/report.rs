//! CSV candidate report.
//!
//! One row per unlinked, deadend or intralinked candidate and one row per
//! interlinked pair. Peptides are rendered with their modification symbols
//! placed after the modified residue; a dynamic configuration that fits
//! several ways lists every placement separated by `;`.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use crate::candidates::{CandidatePeptides, LinkedCandidates};
use crate::index::Candidate;
use crate::io::ProteinDatabase;
use crate::linker::Linker;
use crate::mass_gen::SequenceOptions;
use crate::modification::{decorate, dynamic_placements, static_placement, ModCount};
use crate::runner::SpectrumCandidates;
use crate::sequence::Sequence;

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Scan number.
    pub scan: u32,
    /// Observed precursor Mh.
    pub precursor_mh: f64,
    /// Precursor charge.
    pub charge: u32,
    /// `unlinked`, `deadend`, `intralinked` or `interlinked`.
    pub category: &'static str,
    /// Linker name, empty for unlinked rows.
    pub linker: String,
    /// First peptide.
    pub peptide1: String,
    /// First peptide with modification symbols.
    pub decorated1: String,
    /// Theoretical Mh of the first peptide.
    pub mh1: f64,
    /// Protein of the first peptide.
    pub protein1: String,
    /// Second peptide of a pair.
    pub peptide2: Option<String>,
    /// Second peptide with modification symbols.
    pub decorated2: Option<String>,
    /// Theoretical Mh of the second peptide.
    pub mh2: Option<f64>,
    /// Protein of the second peptide.
    pub protein2: Option<String>,
}

/// Report rows for search results.
pub struct ReportBuilder<'a> {
    options: &'a SequenceOptions,
    proteins: HashMap<usize, &'a str>,
}

fn root_key(sequence: &Sequence) -> usize {
    Arc::as_ptr(sequence.root()) as usize
}

fn mod_counts(counts: &ModCount) -> ModCount {
    counts.iter().filter(|(_, &count)| count > 0).map(|(&s, &c)| (s, c)).collect()
}

impl<'a> ReportBuilder<'a> {
    /// Rows name proteins from `database` and render mods from `options`.
    pub fn new(database: &'a ProteinDatabase, options: &'a SequenceOptions) -> Self {
        let proteins = database
            .proteins()
            .iter()
            .map(|protein| (root_key(&protein.sequence), protein.id.as_str()))
            .collect();
        Self { options, proteins }
    }

    fn protein(&self, sequence: &Sequence) -> String {
        self.proteins
            .get(&root_key(sequence))
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// Every placement of a candidate's modifications, rendered.
    pub fn decorated(&self, candidate: &Candidate) -> String {
        let sequence = &candidate.sequence;
        let statics = static_placement(sequence, &self.options.static_mods);
        let dynamic = mod_counts(&candidate.mass.dynamic_mods);
        dynamic_placements(sequence, &dynamic, &self.options.dynamic_mods)
            .into_iter()
            .map(|placement| {
                let mut combined = statics.clone();
                combined.extend(placement);
                decorate(sequence, &combined)
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    fn single(
        &self,
        found: &SpectrumCandidates,
        category: &'static str,
        linker: &str,
        candidate: &Candidate,
    ) -> ReportRow {
        ReportRow {
            scan: found.spectrum.scan,
            precursor_mh: found.spectrum.precursor_mh,
            charge: found.spectrum.charge,
            category,
            linker: linker.to_string(),
            peptide1: candidate.sequence.to_string(),
            decorated1: self.decorated(candidate),
            mh1: candidate.mass.mh,
            protein1: self.protein(&candidate.sequence),
            peptide2: None,
            decorated2: None,
            mh2: None,
            protein2: None,
        }
    }

    fn linked_rows(
        &self,
        found: &SpectrumCandidates,
        linker: &Linker,
        linked: &LinkedCandidates,
        rows: &mut Vec<ReportRow>,
    ) {
        for candidate in sorted(&linked.deadend) {
            rows.push(self.single(found, "deadend", linker.name(), candidate));
        }
        for candidate in sorted(&linked.intralinked) {
            rows.push(self.single(found, "intralinked", linker.name(), candidate));
        }
        let mut pairs: Vec<_> = linked.interlinked.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        for (first, seconds) in pairs {
            for second in sorted(seconds) {
                let mut row = self.single(found, "interlinked", linker.name(), first);
                row.peptide2 = Some(second.sequence.to_string());
                row.decorated2 = Some(self.decorated(second));
                row.mh2 = Some(second.mass.mh);
                row.protein2 = Some(self.protein(&second.sequence));
                rows.push(row);
            }
        }
    }

    /// Rows for one spectrum, in a stable order.
    pub fn rows(&self, found: &SpectrumCandidates) -> Vec<ReportRow> {
        let CandidatePeptides { unlinked, linked } = &found.candidates;
        let mut rows = Vec::new();
        for candidate in sorted(unlinked) {
            rows.push(self.single(found, "unlinked", "", candidate));
        }
        for (linker, candidates) in linked {
            self.linked_rows(found, linker, candidates, &mut rows);
        }
        rows
    }

    /// Write every row of `results` as CSV with a header line.
    pub fn write_csv<W: Write>(
        &self,
        writer: W,
        results: &[SpectrumCandidates],
    ) -> Result<usize, csv::Error> {
        let mut csv = csv::Writer::from_writer(writer);
        let mut written = 0;
        for found in results {
            for row in self.rows(found) {
                csv.serialize(&row)?;
                written += 1;
            }
        }
        csv.flush()?;
        Ok(written)
    }
}

fn sorted<'c>(candidates: impl IntoIterator<Item = &'c Candidate>) -> Vec<&'c Candidate> {
    let mut sorted: Vec<_> = candidates.into_iter().collect();
    sorted.sort();
    sorted
}
