//! Sync engine: one-way mirroring of a source tree onto a target tree.
//!
//! Pass order:
//! 1. Walk the source; its relative paths are the authoritative keep set.
//! 2. Create missing target directories and copy missing or stale files
//!    (stale = mtimes differ by more than the tolerance).
//! 3. Walk the target and delete every entry outside the keep set.
//!
//! The source filesystem is never touched. The engine has no terminal
//! dependency; callers observe per-action events through [`SyncObserver`].

use crate::error::{io_err, SyncError};
use crate::tree::{mtime_within, Entry, EntryKind, Walker, WalkerConfig};
use filetime::FileTime;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Default modification-time tolerance: files whose mtimes are within
/// this window count as in sync.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_millis(100);

/// Sync engine options
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum mtime difference for a file pair to count as in sync
    pub tolerance: Duration,
    /// Copy failures of these kinds are logged and skipped instead of
    /// aborting the run. Some platforms report a permission error on
    /// copy even though the copy took effect; accepted as a known risk,
    /// not a correctness guarantee.
    pub ignorable_copy_errors: Vec<ErrorKind>,
    /// Walker configuration applied to both the source and target walks
    pub walker: WalkerConfig,
    /// Report planned work without touching the target
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            ignorable_copy_errors: vec![ErrorKind::PermissionDenied],
            walker: WalkerConfig::default(),
            dry_run: false,
        }
    }
}

/// One performed (or, under dry-run, planned) sync action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    FileCopied { path: PathBuf },
    FileDeleted { path: PathBuf },
    DirectoryDeleted { path: PathBuf },
    CopySkipped { path: PathBuf, reason: String },
}

/// Receives sync actions as they happen. Paths are source-root-relative.
pub trait SyncObserver {
    fn notify(&mut self, event: SyncEvent);
}

/// Observer that discards all events.
pub struct NullObserver;

impl SyncObserver for NullObserver {
    fn notify(&mut self, _event: SyncEvent) {}
}

/// Counts of work performed by one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub files_copied: usize,
    pub files_deleted: usize,
    pub directories_created: usize,
    pub directories_deleted: usize,
    pub copies_skipped: usize,
}

impl SyncReport {
    /// True when the run changed nothing (and would change nothing).
    pub fn is_noop(&self) -> bool {
        *self == SyncReport::default()
    }
}

/// Mirror `target` from `source`.
///
/// Mutates `target` only. Copy failures listed in
/// [`SyncOptions::ignorable_copy_errors`] are non-fatal; any other I/O
/// error aborts mid-run, leaving the target partially synced. The tool
/// is a destructive, re-runnable mirror, not a transaction.
pub fn sync(
    source: &Path,
    target: &Path,
    options: &SyncOptions,
    observer: &mut dyn SyncObserver,
) -> Result<SyncReport, SyncError> {
    let source_snapshot = Walker::with_config(source.to_path_buf(), options.walker.clone()).walk()?;
    let mut report = SyncReport::default();

    debug!(
        entries = source_snapshot.len(),
        dry_run = options.dry_run,
        "source walk complete"
    );

    for (relative, entry) in source_snapshot.iter() {
        let source_path = source.join(relative);
        let target_path = target.join(relative);

        match entry.kind {
            EntryKind::Directory => {
                if target_path.is_dir() {
                    continue;
                }
                // Source kind wins: a file standing in the directory's
                // place is a deletion, announced like any other.
                if target_path.is_file() {
                    if !options.dry_run {
                        fs::remove_file(&target_path).map_err(|e| io_err(&target_path, e))?;
                    }
                    report.files_deleted += 1;
                    observer.notify(SyncEvent::FileDeleted {
                        path: relative.clone(),
                    });
                }
                report.directories_created += 1;
                if options.dry_run {
                    continue;
                }
                fs::create_dir_all(&target_path).map_err(|e| io_err(&target_path, e))?;
            }
            EntryKind::File => {
                if !copy_needed(entry, &target_path, options.tolerance)? {
                    continue;
                }
                // Source kind wins: a directory standing in the file's
                // place is deleted before the copy.
                if target_path.is_dir() {
                    if !options.dry_run {
                        fs::remove_dir_all(&target_path).map_err(|e| io_err(&target_path, e))?;
                    }
                    report.directories_deleted += 1;
                    observer.notify(SyncEvent::DirectoryDeleted {
                        path: relative.clone(),
                    });
                }
                if options.dry_run {
                    report.files_copied += 1;
                    observer.notify(SyncEvent::FileCopied {
                        path: relative.clone(),
                    });
                    continue;
                }
                if let Some(parent) = target_path.parent() {
                    fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
                }
                match copy_file(&source_path, &target_path) {
                    Ok(()) => {
                        debug!(path = %relative.display(), "copied file");
                        report.files_copied += 1;
                        observer.notify(SyncEvent::FileCopied {
                            path: relative.clone(),
                        });
                    }
                    Err(err) if options.ignorable_copy_errors.contains(&err.kind()) => {
                        warn!(path = %relative.display(), error = %err, "ignoring copy error");
                        report.copies_skipped += 1;
                        observer.notify(SyncEvent::CopySkipped {
                            path: relative.clone(),
                            reason: err.to_string(),
                        });
                    }
                    Err(err) => return Err(io_err(&source_path, err)),
                }
            }
        }
    }

    // Deletion pass: everything under target whose relative path is not
    // in the keep set goes. Sorted snapshot order puts ancestors before
    // descendants, so descendants of a removed directory are skipped
    // here; NotFound on removal stays as a guard.
    let target_snapshot = Walker::with_config(target.to_path_buf(), options.walker.clone()).walk()?;
    let mut deleted_dirs: Vec<PathBuf> = Vec::new();

    for (relative, entry) in target_snapshot.iter() {
        if source_snapshot.contains(relative) {
            continue;
        }
        // Already gone (or, under dry-run, would be) with an ancestor.
        if deleted_dirs.iter().any(|dir| relative.starts_with(dir)) {
            continue;
        }
        let target_path = target.join(relative);

        match entry.kind {
            EntryKind::Directory => {
                if !options.dry_run && !remove(&target_path, |p| fs::remove_dir_all(p))? {
                    continue;
                }
                deleted_dirs.push(relative.clone());
                debug!(path = %relative.display(), "deleted directory");
                report.directories_deleted += 1;
                observer.notify(SyncEvent::DirectoryDeleted {
                    path: relative.clone(),
                });
            }
            EntryKind::File => {
                if !options.dry_run && !remove(&target_path, |p| fs::remove_file(p))? {
                    continue;
                }
                debug!(path = %relative.display(), "deleted file");
                report.files_deleted += 1;
                observer.notify(SyncEvent::FileDeleted {
                    path: relative.clone(),
                });
            }
        }
    }

    Ok(report)
}

/// Whether the target copy of a source file is missing or stale.
fn copy_needed(
    source_entry: &Entry,
    target_path: &Path,
    tolerance: Duration,
) -> Result<bool, SyncError> {
    let metadata = match fs::metadata(target_path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(io_err(target_path, err)),
    };

    // A directory standing where a file belongs is always stale.
    if metadata.is_dir() {
        return Ok(true);
    }

    let target_mtime = metadata.modified().map_err(|e| io_err(target_path, e))?;
    let source_mtime = source_entry
        .mtime
        .ok_or_else(|| io_err(target_path, io::Error::from(ErrorKind::InvalidInput)))?;

    Ok(!mtime_within(source_mtime, target_mtime, tolerance))
}

/// Copy content, permissions, and mtime from source to target,
/// overwriting any existing target file.
fn copy_file(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target)?;

    let metadata = fs::metadata(source)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(target, mtime)?;
    Ok(())
}

/// Remove an entry, reporting whether it was still there to remove.
fn remove(path: &Path, op: fn(&Path) -> io::Result<()>) -> Result<bool, SyncError> {
    match op(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(io_err(path, err)),
    }
}
