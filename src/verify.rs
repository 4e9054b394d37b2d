//! Verifier
//!
//! Replays every manifest entry against the live file system and reports
//! drift. The pass is read-only with respect to the collection; the only
//! thing it writes is the mismatch report.

use crate::error::EngineError;
use crate::hash;
use crate::store::ManifestStore;
use crate::tree::path;
use crate::types::{ManifestEntry, VerificationResult};
use rayon::prelude::*;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Verification outcome for one manifest entry
#[derive(Debug, Clone, Serialize)]
pub struct EntryOutcome {
    pub entry: ManifestEntry,
    pub result: VerificationResult,
}

impl EntryOutcome {
    /// Report line for a problem, `None` when the entry verified clean.
    pub fn report_line(&self) -> Option<String> {
        let path = &self.entry.path;
        match &self.result {
            VerificationResult::Ok => None,
            VerificationResult::Missing => Some(format!("MISSING FILE\t{}", path)),
            VerificationResult::Mismatch { expected, actual } => Some(format!(
                "CURRENT HASH {} !== ORIGINAL HASH {}\t{}",
                actual, expected, path
            )),
            VerificationResult::Unreadable { cause } => {
                Some(format!("UNREADABLE FILE\t{}\t{}", path, cause))
            }
        }
    }
}

/// All outcomes of one verification pass, in manifest order
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub outcomes: Vec<EntryOutcome>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl VerificationReport {
    pub fn problems(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.result.is_ok())
    }

    pub fn problem_count(&self) -> usize {
        self.problems().count()
    }

    pub fn is_clean(&self) -> bool {
        self.problem_count() == 0
    }

    pub fn verified_count(&self) -> usize {
        self.outcomes.len()
    }
}

/// Re-verifies a manifest against the files it names
pub struct Verifier<'a> {
    workspace: PathBuf,
    store: &'a dyn ManifestStore,
    workers: usize,
}

impl<'a> Verifier<'a> {
    pub fn new(workspace: impl Into<PathBuf>, store: &'a dyn ManifestStore) -> Self {
        Self {
            workspace: workspace.into(),
            store,
            workers: 1,
        }
    }

    /// Number of entries verified concurrently. Values below 1 mean sequential.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Verify every recorded entry, duplicates included.
    ///
    /// Per-entry problems are outcomes, not errors; only an unreadable
    /// manifest aborts the pass.
    pub fn run(&self) -> Result<VerificationReport, EngineError> {
        let started = Instant::now();
        let entries = self.store.list_entries()?;
        info!(entries = entries.len(), "Starting verification");

        let outcomes = if self.workers <= 1 {
            entries.into_iter().map(|entry| self.verify_entry(entry)).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
            pool.install(|| {
                entries
                    .into_par_iter()
                    .map(|entry| self.verify_entry(entry))
                    .collect()
            })
        };

        let report = VerificationReport {
            outcomes,
            elapsed: started.elapsed(),
        };
        info!(
            verified = report.verified_count(),
            problems = report.problem_count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Verified file hashes"
        );
        Ok(report)
    }

    fn verify_entry(&self, entry: ManifestEntry) -> EntryOutcome {
        let file = path::resolve(&self.workspace, &entry.path);
        let result = classify(&file, &entry);
        let outcome = EntryOutcome { entry, result };
        if let Some(line) = outcome.report_line() {
            warn!("{}", line);
        }
        outcome
    }
}

/// Classify one entry against the file at `file`.
pub fn classify(file: &Path, entry: &ManifestEntry) -> VerificationResult {
    match std::fs::metadata(file) {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => return VerificationResult::Missing,
        Err(e) if e.kind() == ErrorKind::NotFound => return VerificationResult::Missing,
        Err(e) => {
            return VerificationResult::Unreadable {
                cause: e.to_string(),
            }
        }
    }

    match hash::digest_file(file) {
        Ok(actual) if actual == entry.digest => VerificationResult::Ok,
        Ok(actual) => VerificationResult::Mismatch {
            expected: entry.digest.clone(),
            actual,
        },
        // Deleted between stat and open.
        Err(failure) if failure.cause.kind() == ErrorKind::NotFound => {
            VerificationResult::Missing
        }
        Err(failure) => VerificationResult::Unreadable {
            cause: failure.cause.to_string(),
        },
    }
}

/// What [`ReportWriter::write`] did with a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// No problems; no report file exists after the call.
    Clean,
    Written { path: PathBuf, problems: usize },
}

/// Writes the mismatch report file
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one line per problem, or remove a stale report when clean.
    pub fn write(&self, report: &VerificationReport) -> Result<ReportOutcome, EngineError> {
        let wrap = |source| EngineError::Report {
            path: self.path.clone(),
            source,
        };

        let mut contents = String::new();
        for line in report.problems().filter_map(EntryOutcome::report_line) {
            contents.push_str(&line);
            contents.push('\n');
        }

        if contents.is_empty() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => info!(report = %self.path.display(), "Removed stale report"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(wrap(e)),
            }
            return Ok(ReportOutcome::Clean);
        }

        std::fs::write(&self.path, contents).map_err(wrap)?;
        let problems = report.problem_count();
        info!(report = %self.path.display(), problems, "Wrote mismatches");
        Ok(ReportOutcome::Written {
            path: self.path.clone(),
            problems,
        })
    }
}
