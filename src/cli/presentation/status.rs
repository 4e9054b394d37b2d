//! Status command presentation.

use crate::error::EngineError;
use serde::Serialize;
use std::path::PathBuf;

/// Read-only manifest statistics
#[derive(Debug, Clone, Serialize)]
pub struct ManifestStatus {
    pub manifest: PathBuf,
    pub collection_root: PathBuf,
    pub report: PathBuf,
    pub entries: usize,
    pub distinct_paths: usize,
    pub report_present: bool,
}

impl ManifestStatus {
    pub fn duplicate_entries(&self) -> usize {
        self.entries - self.distinct_paths
    }
}

pub fn format_status(status: &ManifestStatus, format: &str) -> Result<String, EngineError> {
    if format == "json" {
        let mut value = serde_json::to_value(status)?;
        value["duplicate_entries"] = status.duplicate_entries().into();
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut s = format!(
        "Manifest: {}\n  Entries: {}\n  Distinct paths: {}\n  Duplicates: {}\nCollection root: {}\nReport: {}",
        status.manifest.display(),
        status.entries,
        status.distinct_paths,
        status.duplicate_entries(),
        status.collection_root.display(),
        status.report.display(),
    );
    if status.report_present {
        s.push_str(" (present: last verification found problems)");
    }
    Ok(s)
}
