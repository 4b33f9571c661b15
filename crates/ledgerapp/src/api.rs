//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for all ledger operations, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the [`LedgerStore`] and the loaded [`LedgerConfig`]
//! - **Dispatches** to the appropriate command function
//! - **Supplies configuration** commands need (e.g. default search flags)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Presentation concerns**: returns data structures, not strings
//!
//! ## Generic Over StorageBackend
//!
//! `LedgerApi<B: StorageBackend>` runs the same way over either backend:
//! - Production: `LedgerApi<FsBackend>`
//! - Testing: `LedgerApi<MemBackend>`

use std::fs;
use std::path::Path;

use crate::commands::{self, CmdResult, ListOptions};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::model::{Record, StoreState};
use crate::store::{
    import_json, FsBackend, LedgerStore, StorageBackend, Subscriber, SubscriptionId,
};
use crate::validation::RecordForm;

pub use crate::commands::edit::RecordEdit;
pub use crate::commands::settings::SettingsUpdate;

/// The main API facade for ledger operations.
pub struct LedgerApi<B: StorageBackend> {
    store: LedgerStore<B>,
    config: LedgerConfig,
}

impl<B: StorageBackend> LedgerApi<B> {
    /// Wraps `backend` without loading anything. Call [`LedgerApi::init`]
    /// before use.
    pub fn new(backend: B, config: LedgerConfig) -> Self {
        Self {
            store: LedgerStore::with_backend(backend),
            config,
        }
    }

    /// Loads persisted state, falling back to `seed` when storage is empty.
    pub fn init(&mut self, seed: Vec<Record>) {
        self.store.init(seed);
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &LedgerStore<B> {
        &self.store
    }

    pub fn state(&self) -> StoreState {
        self.store.state()
    }

    pub fn subscribe(&mut self, callback: Subscriber) -> SubscriptionId {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn add_record(&mut self, form: &RecordForm) -> Result<CmdResult> {
        commands::add::run(&mut self.store, form)
    }

    pub fn edit_record(&mut self, id: &str, edit: &RecordEdit) -> Result<CmdResult> {
        commands::edit::run(&mut self.store, id, edit)
    }

    pub fn delete_records<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        commands::delete::run(&mut self.store, ids)
    }

    pub fn clear(&mut self) -> Result<CmdResult> {
        commands::clear::run(&mut self.store)
    }

    pub fn list(&self, options: &ListOptions) -> Result<CmdResult> {
        commands::list::run(&self.store, options, &self.config.search_flags)
    }

    pub fn summary(&self) -> Result<CmdResult> {
        commands::summary::run(&self.store)
    }

    pub fn budget(&self) -> Result<CmdResult> {
        commands::budget::status(&self.store)
    }

    pub fn set_budget(&mut self, raw: &str) -> Result<CmdResult> {
        commands::budget::set(&mut self.store, raw)
    }

    pub fn settings(&self) -> Result<CmdResult> {
        commands::settings::show(&self.store)
    }

    pub fn update_settings(&mut self, update: &SettingsUpdate) -> Result<CmdResult> {
        commands::settings::update(&mut self.store, update)
    }

    pub fn export(&self, output: Option<&Path>) -> Result<CmdResult> {
        commands::export::run(&self.store, output)
    }

    pub fn import(&mut self, text: &str) -> Result<CmdResult> {
        commands::import::run(&mut self.store, text)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<CmdResult> {
        let text = fs::read_to_string(path).map_err(LedgerError::Io)?;
        self.import(&text)
    }
}

/// Opens the filesystem-backed ledger described by `config`, loading the seed
/// file when storage holds no records yet.
pub fn open(config: LedgerConfig) -> Result<LedgerApi<FsBackend>> {
    let data_dir = config.data_dir()?;
    tracing::debug!(data_dir = %data_dir.display(), "opening ledger");

    let seed = match &config.seed_file {
        Some(path) => load_seed(path),
        None => Vec::new(),
    };

    let mut api = LedgerApi::new(FsBackend::new(data_dir), config);
    api.init(seed);
    Ok(api)
}

/// Seed records are best effort: an unreadable or invalid seed file is logged
/// and the ledger starts empty.
fn load_seed(path: &Path) -> Vec<Record> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read seed file");
            return Vec::new();
        }
    };
    match import_json(&text) {
        Ok(data) => data.records,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid seed file");
            Vec::new()
        }
    }
}
