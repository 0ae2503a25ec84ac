//! Parallel index construction and spectrum search.
//!
//! Both phases submit one task per input (protein or spectrum) to a fixed
//! rayon pool. Tasks return owned results over a crossbeam channel and the
//! calling thread merges them as they arrive, so the index is only ever
//! written by the caller and search tasks share it read-only.
//!
//! ```text
//!  caller ──spawn──▶ worker 1 ─┐
//!         ──spawn──▶ worker 2 ─┼──▶ channel ──▶ caller merges
//!         ──spawn──▶ worker n ─┘
//! ```

mod error;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crossbeam_channel::unbounded;
use log::{debug, info, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::candidates::{CandidatePeptides, CandidateSearch};
use crate::config::SearchOptions;
use crate::digest::Digester;
use crate::enumerate::Enumerator;
use crate::index::{IndexEntry, MassIndex};
use crate::io::{expand_paths, read_dta, select_unique_scans, ProteinDatabase, Spectrum};

pub use error::SearchError;

/// Candidates found for one spectrum.
#[derive(Debug, Clone)]
pub struct SpectrumCandidates {
    /// The searched spectrum.
    pub spectrum: Spectrum,
    /// Everything it matched.
    pub candidates: CandidatePeptides,
}

/// A spectrum task that did not complete.
#[derive(Debug)]
pub struct TaskFailure {
    /// Input the task was working on.
    pub path: PathBuf,
    /// What went wrong.
    pub error: SearchError,
}

/// Outcome of a batch search.
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Spectra with at least one candidate, in completion order.
    pub results: Vec<SpectrumCandidates>,
    /// Tasks that failed.
    pub failures: Vec<TaskFailure>,
    /// Number of spectra searched, including those without candidates.
    pub searched: usize,
}

impl SearchReport {
    /// Sort results by scan number.
    pub fn sort_by_scan(&mut self) {
        self.results.sort_by(|a, b| {
            a.spectrum
                .scan
                .cmp(&b.spectrum.scan)
                .then_with(|| a.spectrum.path.cmp(&b.spectrum.path))
        });
    }
}

/// Runs searches under one set of options.
#[derive(Debug)]
pub struct SearchRunner {
    options: SearchOptions,
    pool: ThreadPool,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `task` on every keyed item in `pool` and hand each result, with its
/// key, to `merge` on the calling thread as soon as it is available.
///
/// A panicking task is caught here and reaches `merge` as `Err`.
fn fan_in<K, T, R, F, M>(
    pool: &ThreadPool,
    items: impl IntoIterator<Item = (K, T)>,
    task: F,
    mut merge: M,
) where
    K: Send,
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
    M: FnMut(K, std::thread::Result<R>),
{
    let (sender, receiver) = unbounded();
    let task = &task;
    pool.in_place_scope(|scope| {
        for (key, item) in items {
            let sender = sender.clone();
            scope.spawn(move |_| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(item)));
                if sender.send((key, outcome)).is_err() {
                    warn!("Dropped a task result: the merging thread has stopped");
                }
            });
        }
        drop(sender);
        for (key, outcome) in receiver.iter() {
            merge(key, outcome);
        }
    });
}

impl SearchRunner {
    /// Start a worker pool sized by `options.threads` (0 = one per CPU).
    pub fn new(options: SearchOptions) -> Result<Self, SearchError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .thread_name(|i| format!("xlsearch-worker-{i}"))
            .build()?;
        info!("Search pool started with {} threads", pool.current_num_threads());
        Ok(Self { options, pool })
    }

    /// Options every task reads.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Digest every protein and index the resulting peptides.
    ///
    /// Each protein is digested and weighed by its own task; the index is
    /// assembled here once all tasks have reported. A digestion error aborts
    /// the build.
    pub fn build_index(&self, database: &ProteinDatabase) -> Result<MassIndex, SearchError> {
        let start = Instant::now();
        let options = &self.options;
        let mut entries = Vec::new();
        let mut peptides = 0usize;
        let mut first_error: Option<SearchError> = None;

        fan_in(
            &self.pool,
            database.proteins().iter().map(|protein| (protein.id.as_str(), protein)),
            |protein| -> Result<(usize, Vec<IndexEntry>), SearchError> {
                let digester = Digester::new(
                    &protein.sequence,
                    &options.rule,
                    options.mode,
                    options.digest_tolerance,
                )?;
                let mut count = 0;
                let entries = digester
                    .into_iter_adapter()
                    .inspect(|_| count += 1)
                    .filter_map(|peptide| IndexEntry::from_sequence(peptide, &options.sequence))
                    .collect();
                debug!("Digested {}: {count} peptides", protein.id);
                Ok((count, entries))
            },
            |id, outcome| {
                let outcome = outcome.map_err(|payload| {
                    SearchError::Panicked(format!("{id}: {}", panic_message(payload)))
                });
                match outcome.and_then(|result| result) {
                    Ok((count, found)) => {
                        peptides += count;
                        entries.extend(found);
                    }
                    Err(error) => {
                        first_error.get_or_insert(error);
                    }
                }
            },
        );

        if let Some(error) = first_error {
            return Err(error);
        }
        let index = MassIndex::from_entries(entries);
        info!(
            "Indexed {} proteins: {} peptides, {} entries in {:.2?}",
            database.len(),
            peptides,
            index.len(),
            start.elapsed()
        );
        Ok(index)
    }

    /// All candidates for one precursor Mh.
    pub fn search_mass(&self, index: &MassIndex, precursor_mh: f64) -> CandidatePeptides {
        CandidateSearch::new(index, &self.options.sequence, self.options.precursor_tolerance)
            .candidates(&self.options.linkers, precursor_mh)
    }

    fn search_one(&self, index: &MassIndex, spectrum: Spectrum) -> Option<SpectrumCandidates> {
        let candidates = self.search_mass(index, spectrum.precursor_mh);
        let counts = candidates.counts();
        info!(
            "Scan {} (Mh {:.4}, z={}): {} unlinked, {} deadend, {} intralinked, {} interlinked",
            spectrum.scan,
            spectrum.precursor_mh,
            spectrum.charge,
            counts.unlinked,
            counts.deadend,
            counts.intralinked,
            counts.interlinked
        );
        candidates
            .has_candidates()
            .then_some(SpectrumCandidates { spectrum, candidates })
    }

    fn run_tasks<T, F>(&self, items: Vec<T>, label: impl Fn(&T) -> PathBuf, task: F) -> SearchReport
    where
        T: Send,
        F: Fn(T) -> Result<Option<SpectrumCandidates>, SearchError> + Sync,
    {
        let start = Instant::now();
        let mut report = SearchReport {
            searched: items.len(),
            ..SearchReport::default()
        };
        let labelled: Vec<(PathBuf, T)> =
            items.into_iter().map(|item| (label(&item), item)).collect();
        fan_in(&self.pool, labelled, task, |path, outcome| {
            let outcome = outcome
                .unwrap_or_else(|payload| Err(SearchError::Panicked(panic_message(payload))));
            match outcome {
                Ok(Some(found)) => report.results.push(found),
                Ok(None) => {}
                Err(error) => {
                    warn!("{}: {error}", path.display());
                    report.failures.push(TaskFailure { path, error });
                }
            }
        });
        info!(
            "Searched {} spectra in {:.2?}: {} with candidates, {} failed",
            report.searched,
            start.elapsed(),
            report.results.len(),
            report.failures.len()
        );
        report
    }

    /// Search parsed spectra, one task each.
    pub fn search_spectra(&self, index: &MassIndex, spectra: Vec<Spectrum>) -> SearchReport {
        self.run_tasks(
            spectra,
            |spectrum| spectrum.path.clone(),
            |spectrum| Ok(self.search_one(index, spectrum)),
        )
    }

    /// Read and search DTA files, one task each.
    ///
    /// Directories are expanded to the `.dta` files they contain. Files whose
    /// scan number occurs more than once are skipped. A file that cannot be
    /// read is recorded as a failure without affecting the others.
    pub fn search_dta_files<P: AsRef<Path>>(
        &self,
        index: &MassIndex,
        paths: &[P],
    ) -> Result<SearchReport, SearchError> {
        let files = expand_paths(paths, &["dta"]).map_err(|failed| SearchError::Io {
            path: failed.path,
            source: failed.source,
        })?;
        let files = select_unique_scans(files);
        Ok(self.run_tasks(
            files,
            PathBuf::clone,
            |path| Ok(self.search_one(index, read_dta(&path)?)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::io::Protein;
    use crate::sequence::Sequence;

    fn runner(threads: usize) -> SearchRunner {
        let mut options = Config::default().resolve().unwrap();
        options.threads = threads;
        SearchRunner::new(options).unwrap()
    }

    fn database(sequences: &[&str]) -> ProteinDatabase {
        ProteinDatabase::from_proteins(
            sequences
                .iter()
                .enumerate()
                .map(|(i, s)| Protein {
                    id: format!("P{i}"),
                    description: String::new(),
                    sequence: Sequence::protein(*s),
                })
                .collect(),
        )
    }

    fn spectrum(scan: u32, precursor_mh: f64) -> Spectrum {
        Spectrum {
            scan,
            precursor_mh,
            charge: 2,
            path: PathBuf::from(format!("run.{scan}.{scan}.2.dta")),
            peaks: Vec::new(),
        }
    }

    #[test]
    fn test_build_index_matches_sequential() {
        let runner = runner(3);
        let db = database(&["PEPTIDEKAAAAAAR", "BGGGGKR", "ECCHGDLLECADDR", "MKWVTFISLLLLFSSAYSR"]);
        let index = runner.build_index(&db).unwrap();

        let options = runner.options();
        let sequential: Vec<Sequence> = db
            .proteins()
            .iter()
            .flat_map(|p| {
                let tolerance = options.digest_tolerance;
                crate::digest::digest(&p.sequence, &options.rule, options.mode, tolerance).unwrap()
            })
            .collect();
        assert_eq!(index.len(), sequential.len());
        let mut indexed: Vec<String> = index.entries().iter().map(|e| e.sequence().to_string()).collect();
        let mut expected: Vec<String> = sequential.iter().map(|s| s.to_string()).collect();
        indexed.sort();
        expected.sort();
        assert_eq!(indexed, expected);
    }

    #[test]
    fn test_empty_database() {
        let runner = runner(2);
        let index = runner.build_index(&ProteinDatabase::default()).unwrap();
        assert!(index.is_empty());
        let report = runner.search_spectra(&index, vec![spectrum(1, 1000.0), spectrum(2, 2500.0)]);
        assert_eq!(report.searched, 2);
        assert!(report.results.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_spectra_without_candidates_are_dropped() {
        let runner = runner(2);
        let index = runner.build_index(&database(&["BGGGGKR"])).unwrap();
        let hit = index.entries()[0].lower() + crate::index::INTERVAL_THRESHOLD;
        let spectra = vec![spectrum(7, 50_000.0), spectrum(3, hit), spectrum(5, 1.0)];
        let mut report = runner.search_spectra(&index, spectra);
        report.sort_by_scan();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].spectrum.scan, 3);
        assert!(!report.results[0].candidates.unlinked.is_empty());
    }

    #[test]
    fn test_unreadable_dta_is_isolated() {
        let runner = runner(2);
        let index = runner.build_index(&database(&["BGGGGKR"])).unwrap();
        let hit = index.entries()[0].lower() + crate::index::INTERVAL_THRESHOLD;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run.1.1.1.dta"), format!("{hit} 1\n100.0 5.0\n")).unwrap();
        std::fs::write(dir.path().join("run.2.2.1.dta"), "not a spectrum\n").unwrap();
        std::fs::write(dir.path().join("run.3.3.1.dta"), "").unwrap();
        // scan 4 appears twice and is skipped
        std::fs::write(dir.path().join("run.4.4.1.dta"), format!("{hit} 1\n")).unwrap();
        std::fs::write(dir.path().join("run.4.4.2.dta"), format!("{hit} 2\n")).unwrap();

        let report = runner.search_dta_files(&index, &[dir.path()]).unwrap();
        assert_eq!(report.searched, 3);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].spectrum.scan, 1);
        assert_eq!(report.failures.len(), 2);
        assert!(report
            .failures
            .iter()
            .all(|f| matches!(f.error, SearchError::Dta(_))));
    }

    #[test]
    fn test_panicking_task_keeps_its_path() {
        let runner = runner(2);
        let inputs = vec![PathBuf::from("run.1.1.2.dta"), PathBuf::from("run.2.2.2.dta")];
        let report = runner.run_tasks(inputs, PathBuf::clone, |path| {
            if path.ends_with("run.2.2.2.dta") {
                panic!("corrupt input");
            }
            Ok(None)
        });
        assert_eq!(report.searched, 2);
        assert!(report.results.is_empty());
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.path, PathBuf::from("run.2.2.2.dta"));
        assert!(matches!(&failure.error, SearchError::Panicked(message) if message == "corrupt input"));
    }

    #[test]
    fn test_single_thread_pool() {
        let runner = runner(1);
        assert_eq!(runner.threads(), 1);
        let index = runner.build_index(&database(&["BGGGGKR"])).unwrap();
        let spectra = (0..20).map(|i| spectrum(i, 100.0 * f64::from(i))).collect();
        let report = runner.search_spectra(&index, spectra);
        assert_eq!(report.searched, 20);
    }
}
