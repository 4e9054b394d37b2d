//! Hash-then-verify cycle tests
//!
//! Exercises the hasher and verifier together over a real collection on disk.

use super::test_utils::Collection;
use hashkeep::hash::digest_bytes;
use hashkeep::hasher::IncrementalHasher;
use hashkeep::store::{FileManifestStore, ManifestStore};
use hashkeep::types::VerificationResult;
use hashkeep::verify::{ReportOutcome, ReportWriter, Verifier};
use std::fs;

fn hash_collection(collection: &Collection) -> hashkeep::hasher::HashRunSummary {
    let store = FileManifestStore::open(collection.manifest());
    IncrementalHasher::new(&collection.workspace, collection.root(), &store)
        .run()
        .unwrap()
}

#[test]
fn test_deleted_file_reported_missing() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    collection.write("b.txt", "world");

    let summary = hash_collection(&collection);
    assert_eq!(summary.hashed, 2);
    assert_eq!(
        collection.manifest_text(),
        "5d41402abc4b2a76b9719d911017c592\tdownloads/a.txt\n\
         7d793037a0760186574b0282f2f435e7\tdownloads/b.txt\n"
    );

    fs::remove_file(collection.root().join("b.txt")).unwrap();

    let store = FileManifestStore::open(collection.manifest());
    let report = Verifier::new(&collection.workspace, &store).run().unwrap();
    assert_eq!(report.verified_count(), 2);
    assert_eq!(report.outcomes[0].result, VerificationResult::Ok);
    assert_eq!(report.outcomes[1].result, VerificationResult::Missing);

    let outcome = ReportWriter::new(collection.report()).write(&report).unwrap();
    assert_eq!(
        outcome,
        ReportOutcome::Written {
            path: collection.report(),
            problems: 1
        }
    );
    assert_eq!(
        fs::read_to_string(collection.report()).unwrap(),
        "MISSING FILE\tdownloads/b.txt\n"
    );
}

#[test]
fn test_modified_file_reported_as_mismatch() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    hash_collection(&collection);

    collection.write("a.txt", "world");

    let store = FileManifestStore::open(collection.manifest());
    let report = Verifier::new(&collection.workspace, &store).run().unwrap();
    assert_eq!(
        report.outcomes[0].result,
        VerificationResult::Mismatch {
            expected: digest_bytes(b"hello"),
            actual: digest_bytes(b"world"),
        }
    );

    ReportWriter::new(collection.report()).write(&report).unwrap();
    assert_eq!(
        fs::read_to_string(collection.report()).unwrap(),
        "CURRENT HASH 7d793037a0760186574b0282f2f435e7 !== \
         ORIGINAL HASH 5d41402abc4b2a76b9719d911017c592\tdownloads/a.txt\n"
    );
}

#[test]
fn test_clean_verification_removes_stale_report() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    hash_collection(&collection);
    fs::write(collection.report(), "MISSING FILE\tdownloads/old.txt\n").unwrap();

    let store = FileManifestStore::open(collection.manifest());
    let report = Verifier::new(&collection.workspace, &store).run().unwrap();
    assert!(report.is_clean());

    let outcome = ReportWriter::new(collection.report()).write(&report).unwrap();
    assert_eq!(outcome, ReportOutcome::Clean);
    assert!(!collection.report().exists());
}

#[test]
fn test_verification_does_not_touch_manifest() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    collection.write("nested/deeper/c.bin", "payload");
    hash_collection(&collection);
    let before = collection.manifest_text();

    fs::remove_file(collection.root().join("a.txt")).unwrap();
    let store = FileManifestStore::open(collection.manifest());
    Verifier::new(&collection.workspace, &store).run().unwrap();

    assert_eq!(collection.manifest_text(), before);
}

#[test]
fn test_every_manifest_entry_gets_one_outcome_in_order() {
    let collection = Collection::new();
    for i in 0..25 {
        collection.write(&format!("file_{:02}.txt", i), &format!("content {}", i));
    }
    hash_collection(&collection);
    fs::remove_file(collection.root().join("file_07.txt")).unwrap();
    collection.write("file_13.txt", "changed");

    let store = FileManifestStore::open(collection.manifest());
    let entries = store.list_entries().unwrap();
    let report = Verifier::new(&collection.workspace, &store)
        .with_workers(4)
        .run()
        .unwrap();

    assert_eq!(report.outcomes.len(), entries.len());
    for (outcome, entry) in report.outcomes.iter().zip(&entries) {
        assert_eq!(&outcome.entry, entry);
    }
    assert_eq!(report.problem_count(), 2);
    assert_eq!(report.outcomes[7].result, VerificationResult::Missing);
    assert!(matches!(
        report.outcomes[13].result,
        VerificationResult::Mismatch { .. }
    ));
}

#[test]
fn test_duplicate_entries_are_each_verified() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    fs::write(
        collection.manifest(),
        "5d41402abc4b2a76b9719d911017c592\tdownloads/a.txt\n\
         7d793037a0760186574b0282f2f435e7\tdownloads/a.txt\n",
    )
    .unwrap();

    let store = FileManifestStore::open(collection.manifest());
    let report = Verifier::new(&collection.workspace, &store).run().unwrap();
    assert_eq!(report.verified_count(), 2);
    assert_eq!(report.outcomes[0].result, VerificationResult::Ok);
    assert!(matches!(
        report.outcomes[1].result,
        VerificationResult::Mismatch { .. }
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_does_not_stop_verification() {
    use std::os::unix::fs::PermissionsExt;

    let collection = Collection::new();
    let locked = collection.write("a.txt", "hello");
    collection.write("b.txt", "world");
    hash_collection(&collection);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&locked).is_ok() {
        // Running as root; permissions are not enforced.
        return;
    }

    let store = FileManifestStore::open(collection.manifest());
    let report = Verifier::new(&collection.workspace, &store).run().unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert!(matches!(
        report.outcomes[0].result,
        VerificationResult::Unreadable { .. }
    ));
    assert_eq!(report.outcomes[1].result, VerificationResult::Ok);
}

#[cfg(unix)]
#[test]
fn test_entry_that_cannot_be_checked_does_not_stop_verification() {
    let collection = Collection::new();
    collection.write("a.txt", "hello");
    collection.write("b.txt", "world");
    hash_collection(&collection);

    // Longer than any file name the platform accepts; stat fails even for root.
    let too_long = format!("downloads/{}.mp4", "x".repeat(300));
    let store = FileManifestStore::open(collection.manifest());
    store
        .append(&hashkeep::types::ManifestEntry::new(
            digest_bytes(b"clip"),
            too_long.clone(),
        ))
        .unwrap();

    let report = Verifier::new(&collection.workspace, &store).run().unwrap();
    assert_eq!(report.verified_count(), 3);
    assert_eq!(report.outcomes[0].result, VerificationResult::Ok);
    assert_eq!(report.outcomes[1].result, VerificationResult::Ok);
    assert!(matches!(
        report.outcomes[2].result,
        VerificationResult::Unreadable { .. }
    ));

    ReportWriter::new(collection.report()).write(&report).unwrap();
    let written = fs::read_to_string(collection.report()).unwrap();
    assert!(written.starts_with(&format!("UNREADABLE FILE\t{}\t", too_long)));
}
