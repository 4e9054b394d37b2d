//! Canonical path form for manifest records
//!
//! Manifest paths are relative to the workspace and always use `/` as the
//! separator, so a manifest written on one OS verifies on another.

use crate::error::StoreError;
use std::path::{Component, Path, PathBuf};

/// Convert a file found on disk into its manifest path.
///
/// Files under `workspace` are recorded relative to it; anything else keeps
/// its full path. Components are joined with `/`, so only real separators
/// are rewritten and a `\` inside a Unix file name is kept. Non-UTF-8 paths
/// cannot round-trip through the text manifest and are rejected.
pub fn to_manifest_path(workspace: &Path, file: &Path) -> Result<String, StoreError> {
    let relative = file.strip_prefix(workspace).unwrap_or(file);
    let unrepresentable =
        || StoreError::UnrepresentablePath(relative.to_string_lossy().into_owned());

    let mut manifest_path = String::new();
    for component in relative.components() {
        match component {
            Component::Prefix(prefix) => {
                manifest_path.push_str(prefix.as_os_str().to_str().ok_or_else(unrepresentable)?)
            }
            Component::RootDir => manifest_path.push('/'),
            Component::CurDir => {}
            Component::ParentDir => push_segment(&mut manifest_path, ".."),
            Component::Normal(name) => {
                push_segment(&mut manifest_path, name.to_str().ok_or_else(unrepresentable)?)
            }
        }
    }
    Ok(manifest_path)
}

fn push_segment(manifest_path: &mut String, segment: &str) {
    if !manifest_path.is_empty() && !manifest_path.ends_with('/') {
        manifest_path.push('/');
    }
    manifest_path.push_str(segment);
}

/// Resolve a manifest path back to a location on disk.
pub fn resolve(workspace: &Path, manifest_path: &str) -> PathBuf {
    workspace.join(manifest_path)
}

/// Whether a path can be written as a single manifest line.
pub fn is_representable(manifest_path: &str) -> bool {
    !manifest_path.is_empty() && !manifest_path.contains(['\n', '\r'])
}
