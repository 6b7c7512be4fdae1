//! Verifier: order-independent sync check between two trees.
//!
//! Two trees are in sync when their relative-path sets are identical,
//! every shared path has the same kind, and every shared file pair has
//! mtimes within the tolerance. Comparison is by path lookup, never by
//! walk position, so walk ordering cannot affect the result.

use crate::error::SyncError;
use crate::sync::DEFAULT_TOLERANCE;
use crate::tree::{mtime_within, Walker, WalkerConfig};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Verifier options
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Maximum mtime difference for a file pair to count as in sync
    pub tolerance: Duration,
    /// Walker configuration applied to both walks
    pub walker: WalkerConfig,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            walker: WalkerConfig::default(),
        }
    }
}

/// Whether `target` mirrors `source`. Reads both trees; mutates nothing.
pub fn verify(source: &Path, target: &Path, options: &VerifyOptions) -> Result<bool, SyncError> {
    let source_snapshot = Walker::with_config(source.to_path_buf(), options.walker.clone()).walk()?;
    let target_snapshot = Walker::with_config(target.to_path_buf(), options.walker.clone()).walk()?;

    // Equal sizes plus every source path present in target is a full
    // symmetric membership check; an extra target path would make the
    // sizes differ.
    if source_snapshot.len() != target_snapshot.len() {
        debug!(
            source = source_snapshot.len(),
            target = target_snapshot.len(),
            "entry counts differ"
        );
        return Ok(false);
    }

    for (relative, source_entry) in source_snapshot.iter() {
        let Some(target_entry) = target_snapshot.get(relative) else {
            debug!(path = %relative.display(), "missing from target");
            return Ok(false);
        };

        if source_entry.kind != target_entry.kind {
            debug!(path = %relative.display(), "entry kind differs");
            return Ok(false);
        }

        if let (Some(source_mtime), Some(target_mtime)) = (source_entry.mtime, target_entry.mtime) {
            if !mtime_within(source_mtime, target_mtime, options.tolerance) {
                debug!(path = %relative.display(), "mtime outside tolerance");
                return Ok(false);
            }
        }
    }

    Ok(true)
}
