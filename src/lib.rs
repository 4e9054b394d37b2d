//! Hashkeep: Incremental Integrity Manifests
//!
//! Records an MD5 digest for every file in a collection exactly once, in an
//! append-only manifest, and re-verifies the collection against it later.

pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod hasher;
pub mod logging;
pub mod store;
pub mod tree;
pub mod types;
pub mod verify;
