//! Manifest Store
//!
//! The manifest is an append-only log of `<digest>\t<path>` lines and the
//! single source of truth for what has been recorded. All reads and writes
//! go through a [`ManifestStore`].

pub mod persistence;

pub use persistence::{format_line, parse_manifest, FileManifestStore};

use crate::error::StoreError;
use crate::types::ManifestEntry;
use std::collections::HashSet;

/// Manifest Store interface
pub trait ManifestStore: Send + Sync {
    /// Every record in file order, duplicates included.
    fn list_entries(&self) -> Result<Vec<ManifestEntry>, StoreError>;

    /// Append one record as a complete line.
    ///
    /// On failure the manifest is left as it was before the call.
    fn append(&self, entry: &ManifestEntry) -> Result<(), StoreError>;

    /// The set of distinct paths already recorded.
    fn list_known_paths(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .list_entries()?
            .into_iter()
            .map(|entry| entry.path)
            .collect())
    }
}
