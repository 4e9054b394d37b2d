//! Error types for the hashkeep manifest engine.

use std::path::PathBuf;
use thiserror::Error;

/// A single file could not be read or hashed.
///
/// Local to one file: callers record it and carry on with the rest of the run.
#[derive(Debug, Error)]
#[error("Failed to hash {path:?}: {cause}")]
pub struct HashFailure {
    pub path: PathBuf,
    #[source]
    pub cause: std::io::Error,
}

/// Manifest store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read manifest {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest {path:?} is corrupt at line {line}: {reason}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to append to manifest {path:?}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Failed to append to manifest {path:?}: {source}; removing the partial line also failed: {rollback}"
    )]
    AppendIncomplete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        rollback: std::io::Error,
    },

    #[error("Path cannot be stored in a line-oriented manifest: {0:?}")]
    UnrepresentablePath(String),
}

/// Run-level errors. Any of these aborts a hash or verify pass.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to enumerate collection root {root:?}: {reason}")]
    Enumeration { root: PathBuf, reason: String },

    #[error("Manifest error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to write report {path:?}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Config(err.to_string())
    }
}
