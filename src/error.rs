//! Error types for the mirra directory mirroring tool.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while walking, syncing, or verifying trees.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Attach the offending path to an I/O error.
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}
