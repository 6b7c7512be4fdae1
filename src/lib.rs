//! Mirra: One-Way Directory Mirroring
//!
//! Makes a target directory's tree match a source directory's tree:
//! missing and stale files are copied, entries absent from the source are
//! deleted. Staleness is decided by modification time alone, compared
//! within a configurable tolerance.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod sync;
pub mod tree;
pub mod verify;
