//! Filesystem tree snapshots
//!
//! A snapshot is one point-in-time walk of a directory tree: every file
//! and directory below a root, keyed by root-relative path. Snapshots are
//! the unit of comparison for both the sync engine and the verifier; they
//! live for a single invocation and are never cached or persisted.

pub mod walker;

pub use walker::{Walker, WalkerConfig};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Filesystem entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single walked entry: kind plus modification time.
///
/// Directories carry no mtime; their timestamps are meaningless for sync
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub mtime: Option<SystemTime>,
}

impl Entry {
    pub fn file(mtime: SystemTime) -> Self {
        Self {
            kind: EntryKind::File,
            mtime: Some(mtime),
        }
    }

    pub fn directory() -> Self {
        Self {
            kind: EntryKind::Directory,
            mtime: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// One walk of a directory tree, keyed by root-relative path.
///
/// Relative paths are unique by construction; iteration order is the
/// sorted path order, so repeated walks of an unchanged tree yield the
/// same sequence.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, Entry>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf, entry: Entry) {
        self.entries.insert(path, entry);
    }

    pub fn get(&self, path: &Path) -> Option<&Entry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Entry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether two modification times agree within `tolerance`.
///
/// Symmetric: the comparison does not care which side is newer.
pub fn mtime_within(a: SystemTime, b: SystemTime, tolerance: Duration) -> bool {
    let delta = match a.duration_since(b) {
        Ok(d) => d,
        Err(e) => e.duration(),
    };
    delta <= tolerance
}
