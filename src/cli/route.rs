//! CLI route: resolve options, gate destructive syncs behind
//! confirmation, and dispatch to the sync engine or verifier.

use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, MirraConfig};
use crate::error::SyncError;
use crate::sync::{self, SyncEvent, SyncObserver, SyncReport};
use crate::verify;
use dialoguer::Input;
use std::path::{Path, PathBuf};
use tracing::info;

/// Observer that prints one progress line per performed action.
struct ConsoleObserver;

impl SyncObserver for ConsoleObserver {
    fn notify(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::FileCopied { path } => println!("Copying {}", path.display()),
            SyncEvent::FileDeleted { path } => println!("Deleting file {}", path.display()),
            SyncEvent::DirectoryDeleted { path } => {
                println!("Deleting directory {}", path.display())
            }
            SyncEvent::CopySkipped { path, reason } => {
                println!("Skipping {} ({})", path.display(), reason)
            }
        }
    }
}

/// Execute the parsed command line. Returns the process exit code.
///
/// A verification result of `false` and a declined confirmation are both
/// normal outcomes and exit 0; only propagated errors are failures.
pub fn run(cli: &Cli) -> Result<i32, SyncError> {
    let config = load_config(cli)?;
    let target = resolve_target(&cli.source, cli.target.as_deref());

    if cli.verify {
        let in_sync = verify::verify(&cli.source, &target, &config.verify_options())?;
        println!("{}", in_sync);
        return Ok(0);
    }

    if !cli.yes && !cli.dry_run && !confirm_sync(&target)? {
        info!(target = %target.display(), "sync declined by user");
        return Ok(0);
    }

    let options = config.sync_options(cli.dry_run);
    let report = sync::sync(&cli.source, &target, &options, &mut ConsoleObserver)?;
    print_summary(&report, cli.dry_run);
    Ok(0)
}

/// File/env configuration with CLI flag overrides applied on top.
fn load_config(cli: &Cli) -> Result<MirraConfig, SyncError> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(tolerance_ms) = cli.tolerance_ms {
        config.tolerance_ms = tolerance_ms;
    }
    if cli.follow_symlinks {
        config.follow_symlinks = true;
    }
    config.ignore.extend(cli.ignore.iter().cloned());

    Ok(config)
}

fn resolve_target(source: &Path, target: Option<&Path>) -> PathBuf {
    match target {
        Some(target) => target.to_path_buf(),
        None => sibling_mirror(source),
    }
}

/// Default target: a sibling of the source named after it,
/// e.g. `/data/photos` -> `/data/photos_mirror`.
fn sibling_mirror(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "mirror".to_string());
    source.with_file_name(format!("{}_mirror", name))
}

/// Warn, then read one line; anything short of assent declines.
fn confirm_sync(target: &Path) -> Result<bool, SyncError> {
    println!("-!-!- WARNING -!-!-");
    println!("This will alter files located in {}", target.display());

    let answer: String = Input::new()
        .with_prompt("OK? (y/[N])")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| SyncError::Config(format!("Failed to read confirmation: {}", e)))?;

    Ok(is_affirmative(&answer))
}

/// Only a trimmed, case-insensitive `y` or `yes` counts as assent;
/// anything else (including empty) declines.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_summary(report: &SyncReport, dry_run: bool) {
    let summary = format!(
        "{} file(s) copied, {} director(ies) created, {} file(s) and {} director(ies) deleted, {} copy error(s) ignored",
        report.files_copied,
        report.directories_created,
        report.files_deleted,
        report.directories_deleted,
        report.copies_skipped
    );
    if dry_run {
        println!("Dry run: {}", summary);
    } else {
        println!("Sync complete: {}", summary);
    }
}
