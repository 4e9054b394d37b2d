//! Core types for the hashkeep manifest engine.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Length of a hex-encoded MD5 digest.
pub const DIGEST_HEX_LEN: usize = 32;

/// Hex-encoded MD5 content digest, always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Build a digest from raw MD5 output.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Digest(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = String;

    /// Parse a recorded digest. Uppercase hex is accepted and folded to lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(format!(
                "digest must be {} hex characters, got {}",
                DIGEST_HEX_LEN,
                s.len()
            ));
        }
        let mut raw = [0u8; 16];
        hex::decode_to_slice(s, &mut raw).map_err(|e| format!("invalid digest {:?}: {}", s, e))?;
        Ok(Digest::from_bytes(raw))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One manifest record: the digest a file had when it was first recorded.
///
/// `path` is in canonical manifest form (forward slashes), see [`crate::tree::path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub digest: Digest,
    pub path: String,
}

impl ManifestEntry {
    pub fn new(digest: Digest, path: impl Into<String>) -> Self {
        Self {
            digest,
            path: path.into(),
        }
    }
}

/// Outcome of re-verifying one manifest entry against the live file system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationResult {
    Ok,
    Mismatch { expected: Digest, actual: Digest },
    Missing,
    /// The file exists but could not be read to completion.
    Unreadable { cause: String },
}

impl VerificationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, VerificationResult::Ok)
    }
}
