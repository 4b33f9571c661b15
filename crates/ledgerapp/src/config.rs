//! # Configuration
//!
//! Ledger configuration is managed by [`confique`], layering environment
//! variables over a TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `LEDGER_DATA_DIR`, `LEDGER_SEARCH_FLAGS`, `LEDGER_SEED_FILE`.
//! 2. **Config file**: `ledger.toml` in the OS config directory, or the file
//!    passed with `--config`.
//! 3. **Compiled Defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Where the record and settings slots are stored |
//! | `search_flags` | `i` | Regex flags used when a pattern has none |
//! | `seed_file` | none | JSON records adopted when storage is empty |

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::search::DEFAULT_FLAGS;

pub const CONFIG_FILE_NAME: &str = "ledger.toml";

/// Configuration for ledger, stored in `ledger.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Directory holding the storage slots.
    #[config(env = "LEDGER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Default regex flags for searches (subset of "gimsu").
    #[config(env = "LEDGER_SEARCH_FLAGS", default = "i")]
    pub search_flags: String,

    /// Records to start from when nothing is persisted yet.
    #[config(env = "LEDGER_SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            search_flags: DEFAULT_FLAGS.to_string(),
            seed_file: None,
        }
    }
}

impl LedgerConfig {
    /// Loads env vars over `file` (or the default config file) over defaults.
    /// A missing file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let path = match file {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_file(),
        };

        let mut builder = LedgerConfig::builder().env();
        if let Some(path) = &path {
            tracing::debug!(path = %path.display(), "loading config file");
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// The configured data directory, or the OS default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ledger", "ledger")
}

/// `<OS data dir>/ledger`.
pub fn default_data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| LedgerError::Config("Could not determine data dir".to_string()))
}

/// `<OS config dir>/ledger.toml`, when a home directory can be found.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
