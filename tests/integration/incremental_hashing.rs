//! Incremental hashing tests
//!
//! A file is recorded once, the first time it is seen, and never re-hashed.

use super::test_utils::Collection;
use hashkeep::hasher::IncrementalHasher;
use hashkeep::store::{FileManifestStore, ManifestStore};
use hashkeep::tree::walker::WalkerConfig;
use std::collections::HashSet;
use std::fs;

#[test]
fn test_second_run_appends_nothing() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    collection.write("sub/b.txt", "world");
    let store = FileManifestStore::open(collection.manifest());

    let first = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .run()
        .unwrap();
    let after_first = collection.manifest_text();
    let second = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .run()
        .unwrap();

    assert_eq!(first.hashed, 2);
    assert_eq!(second.hashed, 0);
    assert_eq!(second.already_known, 2);
    assert_eq!(collection.manifest_text(), after_first);
}

#[test]
fn test_only_new_files_are_appended() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    let store = FileManifestStore::open(collection.manifest());
    IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .run()
        .unwrap();

    collection.write("a.txt", "rewritten");
    collection.write("c.txt", "new");
    let summary = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .run()
        .unwrap();

    assert_eq!(summary.hashed, 1);
    let entries = store.list_entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path, "downloads/a.txt");
    assert_eq!(entries[0].digest.as_str(), "5d41402abc4b2a76b9719d911017c592");
    assert_eq!(entries[1].path, "downloads/c.txt");
}

#[test]
fn test_every_file_recorded_after_parallel_run() {
    let collection = Collection::new();
    let mut expected = HashSet::new();
    for dir in ["2019", "2020", "2021"] {
        for i in 0..12 {
            collection.write(&format!("{}/clip_{}.mov", dir, i), &format!("{}-{}", dir, i));
            expected.insert(format!("downloads/{}/clip_{}.mov", dir, i));
        }
    }
    let store = FileManifestStore::open(collection.manifest());

    let summary = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .with_workers(4)
        .run()
        .unwrap();

    assert_eq!(summary.hashed, expected.len());
    assert!(summary.failures.is_empty());
    assert_eq!(store.list_known_paths().unwrap(), expected);
    assert_eq!(store.list_entries().unwrap().len(), expected.len());
}

#[test]
fn test_manifest_inside_collection_is_not_recorded() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    let manifest = collection.root().join("md5s.txt");
    let store = FileManifestStore::open(&manifest);

    IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .exclude(&manifest)
        .run()
        .unwrap();
    let summary = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .exclude(&manifest)
        .run()
        .unwrap();

    assert_eq!(summary.hashed, 0);
    assert_eq!(summary.already_known, 1);
    assert_eq!(summary.excluded, 1);
    let known = store.list_known_paths().unwrap();
    assert_eq!(known.len(), 1);
    assert!(known.contains("downloads/a.txt"));
}

#[test]
fn test_ignored_directories_are_skipped() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    collection.write(".thumbnails/a.png", "thumb");
    let store = FileManifestStore::open(collection.manifest());

    let summary = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .with_walker_config(WalkerConfig {
            ignore_patterns: vec![".thumbnails".to_string()],
            ..WalkerConfig::default()
        })
        .run()
        .unwrap();

    assert_eq!(summary.discovered, 1);
    assert_eq!(summary.hashed, 1);
}

#[test]
fn test_missing_collection_root_aborts() {
    let collection = Collection::new();
    fs::remove_dir(collection.root()).unwrap();
    let store = FileManifestStore::open(collection.manifest());

    let result = IncrementalHasher::new(&collection.workspace, collection.root(), &store).run();
    assert!(result.is_err());
    assert!(!collection.manifest().exists());
}

#[test]
fn test_corrupt_manifest_aborts_without_appending() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    fs::write(collection.manifest(), "not a manifest line\n").unwrap();
    let store = FileManifestStore::open(collection.manifest());

    let result = IncrementalHasher::new(&collection.workspace, collection.root(), &store).run();
    assert!(result.is_err());
    assert_eq!(collection.manifest_text(), "not a manifest line\n");
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_and_retried_later() {
    use std::os::unix::fs::PermissionsExt;

    let collection = Collection::new();
    let locked = collection.write("a.txt", "hello");
    collection.write("b.txt", "world");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&locked).is_ok() {
        // Running as root; permissions are not enforced.
        return;
    }
    let store = FileManifestStore::open(collection.manifest());

    let first = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .run()
        .unwrap();
    assert_eq!(first.hashed, 1);
    assert_eq!(first.failures.len(), 1);
    assert_eq!(first.failures[0].path, locked);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    let second = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .run()
        .unwrap();
    assert_eq!(second.hashed, 1);
    assert!(store.list_known_paths().unwrap().contains("downloads/a.txt"));
}

#[cfg(unix)]
#[test]
fn test_file_name_with_newline_is_skipped_and_stays_pending() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    let bad = collection.write("bad\nname.mp4", "payload");
    collection.write("c.txt", "world");
    let store = FileManifestStore::open(collection.manifest());
    let hasher = IncrementalHasher::new(&collection.workspace, collection.root(), &store);

    let first = hasher.run().unwrap();
    assert_eq!(first.hashed, 2);
    assert_eq!(first.failures.len(), 1);
    assert_eq!(first.failures[0].path, bad);
    assert_eq!(
        store.list_known_paths().unwrap(),
        HashSet::from(["downloads/a.txt".to_string(), "downloads/c.txt".to_string()])
    );

    let scan = hasher.pending().unwrap();
    assert_eq!(scan.files.len(), 1);
    assert_eq!(scan.files[0].file, bad);

    let second = hasher.run().unwrap();
    assert_eq!(second.hashed, 0);
    assert_eq!(second.failures.len(), 1);
    assert_eq!(store.list_entries().unwrap().len(), 2);
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_file_name_is_skipped_and_stays_pending() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let collection = Collection::new();
    collection.write("a.txt", "hello");
    let bad = collection.root().join(OsStr::from_bytes(b"bad\xff.mp4"));
    fs::write(&bad, "payload").unwrap();
    let store = FileManifestStore::open(collection.manifest());
    let hasher = IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .with_workers(2);

    let first = hasher.run().unwrap();
    assert_eq!(first.hashed, 1);
    assert_eq!(first.failures.len(), 1);
    assert_eq!(first.failures[0].path, bad);
    assert_eq!(store.list_entries().unwrap().len(), 1);

    let scan = hasher.pending().unwrap();
    assert_eq!(scan.files.len(), 1);
    assert_eq!(scan.files[0].file, bad);
}

#[cfg(unix)]
#[test]
fn test_backslash_in_name_is_recorded_verbatim_and_verifies() {
    use hashkeep::types::VerificationResult;
    use hashkeep::verify::Verifier;

    let collection = Collection::new();
    collection.write("clip\\part1.mp4", "frames");
    collection.write("clip/part1.mp4", "other frames");
    let store = FileManifestStore::open(collection.manifest());
    let hasher = IncrementalHasher::new(&collection.workspace, collection.root(), &store);

    assert_eq!(hasher.run().unwrap().hashed, 2);
    assert_eq!(hasher.run().unwrap().hashed, 0);

    let entries = store.list_entries().unwrap();
    let paths: HashSet<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        HashSet::from(["downloads/clip\\part1.mp4", "downloads/clip/part1.mp4"])
    );

    let report = Verifier::new(&collection.workspace, &store).run().unwrap();
    assert!(report
        .outcomes
        .iter()
        .all(|outcome| outcome.result == VerificationResult::Ok));
}
