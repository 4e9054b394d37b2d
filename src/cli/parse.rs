//! CLI parse: clap types for hashkeep. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hashkeep - incremental MD5 manifests for archival collections
#[derive(Parser)]
#[command(name = "hashkeep")]
#[command(about = "Record content hashes for new files and verify the collection against them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory; manifest paths are relative to it
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable logging entirely
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Hash files not yet in the manifest and append them
    Hash {
        /// Collection root to scan
        #[arg(long)]
        root: Option<PathBuf>,
        /// Manifest file
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Files hashed concurrently
        #[arg(long)]
        workers: Option<usize>,
        /// List new files without hashing them
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Re-hash every manifest entry and report drift
    Verify {
        /// Manifest file
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Mismatch report file
        #[arg(long)]
        report: Option<PathBuf>,
        /// Files verified concurrently
        #[arg(long)]
        workers: Option<usize>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show manifest statistics and configured locations
    Status {
        /// Manifest file
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
