//! Incremental Hasher
//!
//! Brings the manifest up to date with newly added files. Paths already
//! recorded are never hashed again: content is assumed immutable once
//! recorded, so change detection is left to the verifier.

use crate::error::{EngineError, HashFailure};
use crate::hash;
use crate::store::ManifestStore;
use crate::tree::path;
use crate::tree::walker::{Walker, WalkerConfig};
use crate::types::ManifestEntry;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Outcome of one hashing pass
#[derive(Debug)]
pub struct HashRunSummary {
    /// Regular files found under the collection root
    pub discovered: usize,
    /// Files skipped because their path is already recorded
    pub already_known: usize,
    /// Files skipped because they are the manifest or report
    pub excluded: usize,
    /// New entries appended to the manifest
    pub hashed: usize,
    /// Files that could not be hashed; they remain unrecorded
    pub failures: Vec<HashFailure>,
    pub elapsed: Duration,
}

/// A file found on disk that the manifest does not know yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file: PathBuf,
    pub manifest_path: String,
}

/// Files a run would hash, plus how the rest of the collection was skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingScan {
    pub files: Vec<PendingFile>,
    /// Regular files found under the collection root
    pub discovered: usize,
    pub already_known: usize,
    pub excluded: usize,
}

/// Hashes files under a collection root that are missing from a manifest
pub struct IncrementalHasher<'a> {
    workspace: PathBuf,
    collection_root: PathBuf,
    store: &'a dyn ManifestStore,
    walker_config: WalkerConfig,
    excluded: HashSet<String>,
    workers: usize,
}

impl<'a> IncrementalHasher<'a> {
    pub fn new(
        workspace: impl Into<PathBuf>,
        collection_root: impl Into<PathBuf>,
        store: &'a dyn ManifestStore,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            collection_root: collection_root.into(),
            store,
            walker_config: WalkerConfig::default(),
            excluded: HashSet::new(),
            workers: 1,
        }
    }

    /// Number of files hashed concurrently. Values below 1 mean sequential.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Never record `file`, e.g. the manifest or report living inside the collection.
    pub fn exclude(mut self, file: &Path) -> Self {
        if let Ok(manifest_path) = path::to_manifest_path(&self.workspace, file) {
            self.excluded.insert(manifest_path);
        }
        self
    }

    /// List the files that a run would hash, in processing order.
    pub fn pending(&self) -> Result<PendingScan, EngineError> {
        let files = Walker::with_config(self.collection_root.clone(), self.walker_config.clone())
            .regular_files()?;
        let known = self.store.list_known_paths()?;

        let mut scan = PendingScan {
            discovered: files.len(),
            ..PendingScan::default()
        };
        let mut queued = HashSet::new();
        for file in files {
            let manifest_path = match path::to_manifest_path(&self.workspace, &file) {
                Ok(manifest_path) => manifest_path,
                Err(e) => {
                    // Reported as a failure by `run` once hashing starts.
                    warn!(file = %file.display(), error = %e, "Path cannot be recorded");
                    file.to_string_lossy().into_owned()
                }
            };
            if self.excluded.contains(&manifest_path) {
                scan.excluded += 1;
                continue;
            }
            if known.contains(&manifest_path) {
                scan.already_known += 1;
                continue;
            }
            if !queued.insert(manifest_path.clone()) {
                warn!(
                    file = %file.display(),
                    manifest_path = %manifest_path,
                    "Another file maps to the same manifest path, skipping"
                );
                continue;
            }
            scan.files.push(PendingFile {
                file,
                manifest_path,
            });
        }

        Ok(scan)
    }

    /// Hash every new file and append one entry per success.
    ///
    /// Each entry is appended as soon as its hash is known, so an interrupted
    /// run leaves every processed file recorded exactly once. Per-file hash
    /// failures are collected and the run continues; an append failure stops it.
    pub fn run(&self) -> Result<HashRunSummary, EngineError> {
        let started = Instant::now();
        let scan = self.pending()?;
        let pending = &scan.files;
        let total = pending.len();
        info!(
            root = %self.collection_root.display(),
            discovered = scan.discovered,
            new = total,
            "Starting incremental hash"
        );

        let failures = Mutex::new(Vec::new());
        let hashed = AtomicUsize::new(0);
        let progress = AtomicUsize::new(0);

        let process = |pending_file: &PendingFile| -> Result<(), EngineError> {
            let position = progress.fetch_add(1, Ordering::Relaxed) + 1;
            info!(
                "Hashing file ({}/{}): {}",
                position, total, pending_file.manifest_path
            );
            match self.hash_one(pending_file) {
                Ok(entry) => {
                    self.store.append(&entry)?;
                    hashed.fetch_add(1, Ordering::Relaxed);
                }
                Err(failure) => {
                    warn!(error = %failure, "Skipping file");
                    failures.lock().push(failure);
                }
            }
            Ok(())
        };

        if self.workers <= 1 {
            pending.iter().try_for_each(process)?;
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
            pool.install(|| pending.par_iter().try_for_each(process))?;
        }

        let summary = HashRunSummary {
            discovered: scan.discovered,
            already_known: scan.already_known,
            excluded: scan.excluded,
            hashed: hashed.into_inner(),
            failures: failures.into_inner(),
            elapsed: started.elapsed(),
        };
        info!(
            hashed = summary.hashed,
            failed = summary.failures.len(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Hashed new files"
        );
        Ok(summary)
    }

    fn hash_one(&self, pending_file: &PendingFile) -> Result<ManifestEntry, HashFailure> {
        if !path::is_representable(&pending_file.manifest_path)
            || pending_file.file.to_str().is_none()
        {
            return Err(HashFailure {
                path: pending_file.file.clone(),
                cause: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "path cannot be stored in the manifest",
                ),
            });
        }
        let digest = hash::digest_file(&pending_file.file)?;
        Ok(ManifestEntry::new(digest, pending_file.manifest_path.clone()))
    }
}
