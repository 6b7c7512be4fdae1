//! Filesystem walker for traversing directory structures

use crate::error::{io_err, SyncError};
use crate::tree::{Entry, Snapshot};
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false for determinism)
    pub follow_symlinks: bool,
    /// Entry names to leave out of the walk (e.g. ".git", "target").
    /// Default: empty — a mirror covers everything.
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore_patterns: Vec::new(),
            max_depth: None,
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the tree under the root and collect a snapshot.
    ///
    /// Every descendant file and directory is recorded under its
    /// root-relative path; the root itself is excluded. Entries that are
    /// neither plain file nor directory (unfollowed symlinks, sockets)
    /// are skipped.
    pub fn walk(&self) -> Result<Snapshot, SyncError> {
        if !self.root.exists() {
            return Err(SyncError::RootNotFound(self.root.clone()));
        }

        let mut snapshot = Snapshot::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX));

        for entry in walker {
            let entry = entry?;

            if self.should_ignore(&entry) {
                continue;
            }

            // Skip the root directory itself (we only want its contents)
            if entry.path() == self.root {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_path_buf();

            let metadata = entry.metadata()?;

            if metadata.is_file() {
                let mtime = metadata.modified().map_err(|e| io_err(entry.path(), e))?;
                snapshot.insert(relative, Entry::file(mtime));
            } else if metadata.is_dir() {
                snapshot.insert(relative, Entry::directory());
            }
            // Skip symlinks if not following them
        }

        Ok(snapshot)
    }

    /// Check if an entry should be ignored based on ignore patterns.
    ///
    /// A pattern matches whole path components only; substring matches
    /// would silently hole the mirror.
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        for pattern in &self.config.ignore_patterns {
            for component in entry.path().components() {
                if let std::path::Component::Normal(name) = component {
                    if name.to_string_lossy() == pattern.as_str() {
                        return true;
                    }
                }
            }
        }

        false
    }
}
