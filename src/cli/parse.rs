//! CLI parse: clap types for mirra. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Mirra CLI - one-way directory mirroring
#[derive(Parser)]
#[command(name = "mirra")]
#[command(about = "Mirror a target directory from a source directory")]
pub struct Cli {
    /// Reference directory. Never modified.
    pub source: PathBuf,

    /// Directory changed to match source (default: sibling of source
    /// named "<source>_mirror")
    pub target: Option<PathBuf>,

    /// Only verify whether the two directories are in sync
    #[arg(short = 'V', long = "verify")]
    pub verify: bool,

    /// Skip the interactive confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Report planned copies and deletions without touching the target
    #[arg(long)]
    pub dry_run: bool,

    /// Modification-time tolerance in milliseconds
    #[arg(long)]
    pub tolerance_ms: Option<u64>,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Entry name to leave out of the mirror (repeatable)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}
