//! Collection tree
//!
//! Enumerates the files under the collection root and maps them to the
//! portable path form stored in the manifest.

pub mod path;
pub mod walker;
