//! CLI: argument parsing, routing, and error presentation.

pub mod parse;
pub mod route;

pub use parse::Cli;
pub use route::run;

use crate::error::SyncError;

/// Map an error to a user-facing message.
pub fn map_error(err: &SyncError) -> String {
    match err {
        SyncError::RootNotFound(path) => {
            format!("Directory not found: {}", path.display())
        }
        other => other.to_string(),
    }
}
