//! File-backed persistence for the manifest

use crate::error::StoreError;
use crate::store::ManifestStore;
use crate::tree::path;
use crate::types::ManifestEntry;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Plain-text manifest file, one record per line
pub struct FileManifestStore {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl FileManifestStore {
    /// Create a store for the manifest at `path`.
    ///
    /// Nothing is read or created until the first operation; a manifest that
    /// does not exist yet reads as empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            append_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_contents(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl ManifestStore for FileManifestStore {
    fn list_entries(&self) -> Result<Vec<ManifestEntry>, StoreError> {
        let Some(bytes) = self.read_contents()? else {
            debug!(manifest = %self.path.display(), "Manifest absent, treating as empty");
            return Ok(Vec::new());
        };

        let contents = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            StoreError::Corrupt {
                path: self.path.clone(),
                line: valid.iter().filter(|b| **b == b'\n').count() + 1,
                reason: "not valid UTF-8".to_string(),
            }
        })?;

        let entries = parse_manifest(&self.path, &contents)?;
        debug!(
            manifest = %self.path.display(),
            entries = entries.len(),
            "Read manifest"
        );
        Ok(entries)
    }

    fn append(&self, entry: &ManifestEntry) -> Result<(), StoreError> {
        if !path::is_representable(&entry.path) {
            return Err(StoreError::UnrepresentablePath(entry.path.clone()));
        }
        let line = format_line(entry);

        let _guard = self.append_lock.lock();
        let wrap = |source| StoreError::Append {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(wrap)?;
        let original_len = file.metadata().map_err(wrap)?.len();

        write_line(&self.path, &mut file, line.as_bytes(), |file| {
            file.set_len(original_len)
        })?;

        debug!(path = %entry.path, digest = %entry.digest, "Appended manifest entry");
        Ok(())
    }
}

/// Write `line` in one call. If that fails, `roll_back` must remove whatever
/// part of the line reached the writer.
fn write_line<W: Write>(
    manifest: &Path,
    writer: &mut W,
    line: &[u8],
    roll_back: impl FnOnce(&mut W) -> std::io::Result<()>,
) -> Result<(), StoreError> {
    let Err(source) = writer.write_all(line) else {
        return Ok(());
    };
    match roll_back(writer) {
        Ok(()) => Err(StoreError::Append {
            path: manifest.to_path_buf(),
            source,
        }),
        Err(rollback) => {
            warn!(
                manifest = %manifest.display(),
                error = %rollback,
                "Could not remove partial manifest line"
            );
            Err(StoreError::AppendIncomplete {
                path: manifest.to_path_buf(),
                source,
                rollback,
            })
        }
    }
}

/// Render one record as a manifest line, trailing newline included.
pub fn format_line(entry: &ManifestEntry) -> String {
    format!("{}\t{}\n", entry.digest, entry.path)
}

/// Parse manifest text into entries, in file order.
///
/// Blank lines are skipped and a trailing `\r` is tolerated. Any other
/// malformed record, including one cut off before its newline, makes the
/// whole manifest corrupt.
pub fn parse_manifest(manifest: &Path, contents: &str) -> Result<Vec<ManifestEntry>, StoreError> {
    let corrupt = |line: usize, reason: String| StoreError::Corrupt {
        path: manifest.to_path_buf(),
        line,
        reason,
    };

    let mut entries = Vec::new();
    let mut segments = contents.split('\n').enumerate().peekable();

    while let Some((index, segment)) = segments.next() {
        let line_no = index + 1;
        let is_last = segments.peek().is_none();
        let record = segment.strip_suffix('\r').unwrap_or(segment);

        if record.trim().is_empty() {
            continue;
        }
        if is_last {
            return Err(corrupt(line_no, "truncated record (no trailing newline)".to_string()));
        }

        let (digest, entry_path) = record
            .split_once('\t')
            .ok_or_else(|| corrupt(line_no, "missing tab separator".to_string()))?;
        let digest = digest.parse().map_err(|e| corrupt(line_no, e))?;
        if entry_path.is_empty() {
            return Err(corrupt(line_no, "empty path".to_string()));
        }

        entries.push(ManifestEntry::new(digest, entry_path));
    }

    Ok(entries)
}
