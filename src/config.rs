//! Configuration System
//!
//! Optional TOML configuration (`mirra.toml` in the working directory or
//! an explicit `--config` path) with `MIRRA`-prefixed environment
//! variable overrides. CLI flags are applied on top by the routing layer,
//! so the precedence is CLI > environment > file > defaults.

use crate::error::SyncError;
use crate::logging::LoggingConfig;
use crate::sync::SyncOptions;
use crate::tree::WalkerConfig;
use crate::verify::VerifyOptions;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirraConfig {
    /// Modification-time tolerance in milliseconds
    #[serde(default = "default_tolerance_ms")]
    pub tolerance_ms: u64,

    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Entry names excluded from the mirror (matched per path component)
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_tolerance_ms() -> u64 {
    100
}

impl Default for MirraConfig {
    fn default() -> Self {
        Self {
            tolerance_ms: default_tolerance_ms(),
            follow_symlinks: false,
            ignore: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MirraConfig {
    pub fn tolerance(&self) -> Duration {
        Duration::from_millis(self.tolerance_ms)
    }

    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            ignore_patterns: self.ignore.clone(),
            max_depth: None,
        }
    }

    pub fn sync_options(&self, dry_run: bool) -> SyncOptions {
        SyncOptions {
            tolerance: self.tolerance(),
            walker: self.walker_config(),
            dry_run,
            ..SyncOptions::default()
        }
    }

    pub fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            tolerance: self.tolerance(),
            walker: self.walker_config(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the default location (`mirra.toml` if present) plus
    /// environment overrides; falls back to defaults.
    pub fn load() -> Result<MirraConfig, SyncError> {
        let settings = Config::builder()
            .add_source(File::with_name("mirra").required(false))
            .add_source(env_source())
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Load from an explicit file; the file must exist and parse.
    pub fn load_from_file(path: &Path) -> Result<MirraConfig, SyncError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(env_source())
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

/// `MIRRA`-prefixed environment overrides, e.g. `MIRRA_TOLERANCE_MS=250`
/// or `MIRRA_LOGGING__LEVEL=debug` for nested keys.
fn env_source() -> Environment {
    Environment::with_prefix("MIRRA")
        .separator("__")
        .try_parsing(true)
}
