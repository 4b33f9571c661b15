//! # Storage Layer
//!
//! The ledger keeps all state in memory and mirrors it into a key/value
//! backend after every change.
//!
//! ## Layers
//!
//! 1. [`backend::StorageBackend`]: raw byte slots addressed by string keys.
//!    [`fs_backend::FsBackend`] writes one file per slot, [`mem_backend::MemBackend`]
//!    keeps slots in memory for tests.
//! 2. [`persistence::Persistence`]: JSON encoding of the two slots
//!    (`finance:data:v1` for records, `finance:settings:v1` for settings) and
//!    the export/import interchange format.
//! 3. [`ledger_store::LedgerStore`]: the authority. Mutations update memory,
//!    mirror to persistence, then notify subscribers, in that order.
//!
//! ## Failure Model
//!
//! Storage never makes a mutation fail. Reads that cannot produce usable data
//! come back empty, writes that fail are logged and reported through
//! [`ledger_store::LedgerStore::last_save_succeeded`]. The in-memory state
//! remains correct for the rest of the session.

pub mod backend;
pub mod fs_backend;
pub mod ledger_store;
pub mod mem_backend;
pub mod persistence;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use ledger_store::{LedgerStore, Subscriber, SubscriberResult, SubscriptionId};
pub use mem_backend::MemBackend;
pub use persistence::{
    export_json, import_json, ExportBundle, ImportData, ImportError, Persistence, RECORDS_KEY,
    SETTINGS_KEY,
};
