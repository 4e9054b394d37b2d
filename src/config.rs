//! Configuration System
//!
//! Layered configuration for the collection locations, worker counts and
//! logging. Sources merge defaults, a global file, a workspace file and
//! environment variables; CLI flags are applied on top by the caller.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashkeepConfig {
    /// Collection and manifest locations
    #[serde(default)]
    pub collection: CollectionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the collection, manifest and report live, relative to the workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Directory scanned recursively for regular files
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Append-only digest manifest
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Mismatch report, only present after a verification found problems
    #[serde(default = "default_report")]
    pub report: PathBuf,

    /// Files hashed or verified concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Directory or file names skipped while scanning
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Follow symbolic links while scanning
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("md5s.txt")
}

fn default_report() -> PathBuf {
    PathBuf::from("mismatches.txt")
}

fn default_workers() -> usize {
    1
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            manifest: default_manifest(),
            report: default_report(),
            workers: default_workers(),
            ignore: Vec::new(),
            follow_symlinks: false,
        }
    }
}

/// Collection locations resolved against a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub report: PathBuf,
}

impl CollectionConfig {
    /// Join relative locations onto the workspace; absolute ones are kept.
    pub fn resolve_paths(&self, workspace_root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            root: workspace_root.join(&self.root),
            manifest: workspace_root.join(&self.manifest),
            report: workspace_root.join(&self.report),
        }
    }

    /// Validate collection configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("Collection root cannot be empty".to_string());
        }
        if self.manifest.as_os_str().is_empty() {
            return Err("Manifest path cannot be empty".to_string());
        }
        if self.report.as_os_str().is_empty() {
            return Err("Report path cannot be empty".to_string());
        }
        if self.manifest == self.report {
            return Err(format!(
                "Manifest and report must be different files (both {:?})",
                self.manifest
            ));
        }
        if self.workers == 0 {
            return Err("Workers must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Collection(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Collection(msg) => write!(f, "Collection: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl HashkeepConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.collection.validate() {
            errors.push(ValidationError::Collection(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
