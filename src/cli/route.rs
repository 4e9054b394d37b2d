//! CLI route: single route table and run context. Dispatches to engine services and presentation.

use crate::cli::command_name;
use crate::cli::output::CommandOutput;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_hash_summary, format_pending, format_status, format_verification, ManifestStatus,
};
use crate::config::{ConfigLoader, HashkeepConfig};
use crate::error::EngineError;
use crate::hasher::IncrementalHasher;
use crate::store::{FileManifestStore, ManifestStore};
use crate::tree::walker::WalkerConfig;
use crate::verify::{ReportWriter, Verifier};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: resolved workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: HashkeepConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, EngineError> {
        let workspace_root = dunce::canonicalize(&workspace_root).map_err(|e| {
            EngineError::Config(format!("Workspace {:?} is not accessible: {}", workspace_root, e))
        })?;

        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(workspace_root, config)
    }

    /// Create run context from an already-loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: HashkeepConfig) -> Result<Self, EngineError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            EngineError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &HashkeepConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, EngineError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, EngineError> {
        match command {
            Commands::Hash {
                root,
                manifest,
                workers,
                dry_run,
                format,
            } => self.handle_hash(
                root.as_deref(),
                manifest.as_deref(),
                *workers,
                *dry_run,
                format,
            ),
            Commands::Verify {
                manifest,
                report,
                workers,
                format,
            } => self.handle_verify(manifest.as_deref(), report.as_deref(), *workers, format),
            Commands::Status { manifest, format } => {
                self.handle_status(manifest.as_deref(), format)
            }
        }
    }

    fn handle_hash(
        &self,
        root: Option<&Path>,
        manifest: Option<&Path>,
        workers: Option<usize>,
        dry_run: bool,
        format: &str,
    ) -> Result<CommandOutput, EngineError> {
        let paths = self.config.collection.resolve_paths(&self.workspace_root);
        let root = self.resolve_override(root, paths.root);
        let manifest = self.resolve_override(manifest, paths.manifest);
        let workers = self.workers(workers)?;

        let store = FileManifestStore::open(&manifest);
        let walker_config = WalkerConfig {
            follow_symlinks: self.config.collection.follow_symlinks,
            ignore_patterns: self.config.collection.ignore.clone(),
        };
        let hasher = IncrementalHasher::new(&self.workspace_root, &root, &store)
            .with_workers(workers)
            .with_walker_config(walker_config)
            .exclude(&manifest)
            .exclude(&paths.report);

        if dry_run {
            let scan = hasher.pending()?;
            return Ok(CommandOutput {
                text: format_pending(&scan, format)?,
                problems_found: false,
            });
        }

        let summary = hasher.run()?;
        Ok(CommandOutput {
            text: format_hash_summary(&summary, format)?,
            problems_found: !summary.failures.is_empty(),
        })
    }

    fn handle_verify(
        &self,
        manifest: Option<&Path>,
        report: Option<&Path>,
        workers: Option<usize>,
        format: &str,
    ) -> Result<CommandOutput, EngineError> {
        let paths = self.config.collection.resolve_paths(&self.workspace_root);
        let manifest = self.resolve_override(manifest, paths.manifest);
        let report_path = self.resolve_override(report, paths.report);
        if manifest == report_path {
            return Err(EngineError::Config(
                "Manifest and report must be different files".to_string(),
            ));
        }
        let workers = self.workers(workers)?;

        let store = FileManifestStore::open(&manifest);
        let report = Verifier::new(&self.workspace_root, &store)
            .with_workers(workers)
            .run()?;
        let outcome = ReportWriter::new(report_path).write(&report)?;

        Ok(CommandOutput {
            text: format_verification(&report, &outcome, format)?,
            problems_found: !report.is_clean(),
        })
    }

    fn handle_status(
        &self,
        manifest: Option<&Path>,
        format: &str,
    ) -> Result<CommandOutput, EngineError> {
        let paths = self.config.collection.resolve_paths(&self.workspace_root);
        let manifest = self.resolve_override(manifest, paths.manifest);

        let store = FileManifestStore::open(&manifest);
        let entries = store.list_entries()?.len();
        let distinct_paths = store.list_known_paths()?.len();

        let status = ManifestStatus {
            manifest,
            collection_root: paths.root,
            report_present: paths.report.is_file(),
            report: paths.report,
            entries,
            distinct_paths,
        };
        Ok(CommandOutput {
            text: format_status(&status, format)?,
            problems_found: false,
        })
    }

    fn resolve_override(&self, flag: Option<&Path>, configured: PathBuf) -> PathBuf {
        match flag {
            Some(path) => self.workspace_root.join(path),
            None => configured,
        }
    }

    fn workers(&self, flag: Option<usize>) -> Result<usize, EngineError> {
        match flag {
            Some(0) => Err(EngineError::Config("--workers must be at least 1".to_string())),
            Some(n) => Ok(n),
            None => Ok(self.config.collection.workers),
        }
    }
}
