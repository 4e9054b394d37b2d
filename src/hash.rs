//! Content hashing for manifest entries using MD5
//!
//! Files are streamed through the digest in fixed-size chunks, so memory use
//! does not grow with file size. MD5 guards against accidental corruption only.

use crate::error::HashFailure;
use crate::types::Digest;
use md5::{Digest as _, Md5};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Read size for each chunk fed into the digest.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the digest of everything `reader` yields until end-of-stream.
pub fn digest_reader<R: Read>(mut reader: R) -> std::io::Result<Digest> {
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let count = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..count]);
    }

    Ok(Digest::from_bytes(hasher.finalize().into()))
}

/// Compute the digest of a file on disk.
///
/// Open and read errors (permission denied, file vanished mid-read) surface
/// as [`HashFailure`]; nothing is retried.
pub fn digest_file(path: &Path) -> Result<Digest, HashFailure> {
    let wrap = |cause| HashFailure {
        path: path.to_path_buf(),
        cause,
    };
    let file = File::open(path).map_err(wrap)?;
    digest_reader(file).map_err(wrap)
}

/// Compute the digest of an in-memory buffer
pub fn digest_bytes(content: &[u8]) -> Digest {
    Digest::from_bytes(Md5::digest(content).into())
}
