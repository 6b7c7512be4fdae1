//! Integration tests for the sync engine: mirroring, idempotence, and
//! convergence with the verifier.

use crate::integration::test_utils::{set_mtime, write_file, write_file_at};
use mirra::sync::{sync, NullObserver, SyncOptions};
use mirra::tree::mtime_within;
use mirra::verify::{verify, VerifyOptions};
use std::fs;
use tempfile::TempDir;

const T: i64 = 1_600_000_000;

#[test]
fn test_mirror_copies_and_creates_directories() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_file_at(source.path(), "a.txt", "X", T);
    write_file_at(source.path(), "sub/b.txt", "B", T);
    // Target has an outdated copy of a.txt and no sub/ at all.
    write_file_at(target.path(), "a.txt", "Y", T - 5);

    let report = sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();

    assert_eq!(fs::read_to_string(target.path().join("a.txt")).unwrap(), "X");
    assert_eq!(
        fs::read_to_string(target.path().join("sub").join("b.txt")).unwrap(),
        "B"
    );
    assert!(target.path().join("sub").is_dir());
    assert_eq!(report.files_copied, 2);

    let source_mtime = fs::metadata(source.path().join("a.txt"))
        .unwrap()
        .modified()
        .unwrap();
    let target_mtime = fs::metadata(target.path().join("a.txt"))
        .unwrap()
        .modified()
        .unwrap();
    assert!(mtime_within(
        source_mtime,
        target_mtime,
        SyncOptions::default().tolerance
    ));
}

#[test]
fn test_mirror_deletes_stale_entries_only() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_file_at(source.path(), "a.txt", "A", T);
    write_file_at(target.path(), "a.txt", "A", T);
    write_file_at(target.path(), "stale.txt", "S", T);

    let report = sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();

    // a.txt was already in sync: untouched, not re-copied.
    assert_eq!(report.files_copied, 0);
    assert_eq!(report.files_deleted, 1);
    assert!(target.path().join("a.txt").exists());
    assert!(!target.path().join("stale.txt").exists());
}

#[test]
fn test_deletion_completeness() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_file_at(source.path(), "keep.txt", "k", T);
    write_file_at(target.path(), "keep.txt", "k", T);
    let extras = [
        "extra.txt",
        "old/one.txt",
        "old/nested/two.txt",
        "other_dir/file.txt",
    ];
    for rel in extras {
        write_file_at(target.path(), rel, "x", T);
    }

    sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();

    for rel in extras {
        assert!(!target.path().join(rel).exists(), "{rel} should be gone");
    }
    assert!(!target.path().join("old").exists());
    assert!(!target.path().join("other_dir").exists());
    assert!(target.path().join("keep.txt").exists());
}

#[test]
fn test_sync_converges_then_verifies() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_file_at(source.path(), "a.txt", "X", T);
    write_file_at(source.path(), "sub/b.txt", "B", T);
    write_file_at(source.path(), "sub/deeper/c.txt", "C", T + 10);
    write_file_at(target.path(), "a.txt", "Y", T - 5);
    write_file_at(target.path(), "dead/d.txt", "D", T);

    sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();

    assert!(verify(source.path(), target.path(), &VerifyOptions::default()).unwrap());
}

#[test]
fn test_second_sync_is_a_noop() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_file_at(source.path(), "a.txt", "X", T);
    write_file_at(source.path(), "sub/b.txt", "B", T);
    write_file_at(target.path(), "junk.txt", "J", T);

    let first = sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();
    assert!(!first.is_noop());

    let second = sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();
    assert!(second.is_noop(), "unexpected work: {second:?}");
}

#[test]
fn test_copy_necessity_respects_tolerance() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let source_file = write_file(source.path(), "a.txt", "new");
    let target_file = write_file(target.path(), "a.txt", "old");
    set_mtime(&source_file, T, 0);
    set_mtime(&target_file, T, 100_000_000);

    let report = sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();

    // Exactly 100ms apart: still within tolerance, no copy.
    assert_eq!(report.files_copied, 0);
    assert_eq!(fs::read_to_string(&target_file).unwrap(), "old");

    set_mtime(&target_file, T, 101_000_000);
    let report = sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();

    assert_eq!(report.files_copied, 1);
    assert_eq!(fs::read_to_string(&target_file).unwrap(), "new");
}

#[test]
fn test_tighter_tolerance_forces_copy() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let source_file = write_file(source.path(), "a.txt", "new");
    let target_file = write_file(target.path(), "a.txt", "old");
    set_mtime(&source_file, T, 0);
    set_mtime(&target_file, T, 50_000_000);

    let options = SyncOptions {
        tolerance: std::time::Duration::from_millis(10),
        ..SyncOptions::default()
    };
    let report = sync(source.path(), target.path(), &options, &mut NullObserver).unwrap();

    assert_eq!(report.files_copied, 1);
    assert_eq!(fs::read_to_string(&target_file).unwrap(), "new");
}

#[test]
fn test_ignored_names_survive_in_target() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_file_at(source.path(), "a.txt", "A", T);
    write_file_at(target.path(), "a.txt", "A", T);
    write_file_at(target.path(), ".git/config", "local state", T);

    let mut options = SyncOptions::default();
    options.walker.ignore_patterns = vec![".git".to_string()];
    let report = sync(source.path(), target.path(), &options, &mut NullObserver).unwrap();

    // Ignored names are outside the mirror in both directions: neither
    // copied nor deleted.
    assert!(report.is_noop());
    assert!(target.path().join(".git").join("config").exists());
}

#[test]
fn test_empty_source_empties_target() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_file_at(target.path(), "a.txt", "A", T);
    write_file_at(target.path(), "sub/b.txt", "B", T);

    sync(
        source.path(),
        target.path(),
        &SyncOptions::default(),
        &mut NullObserver,
    )
    .unwrap();

    assert_eq!(fs::read_dir(target.path()).unwrap().count(), 0);
    assert!(verify(source.path(), target.path(), &VerifyOptions::default()).unwrap());
}
