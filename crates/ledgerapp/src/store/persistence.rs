//! Mirrors store state into a [`StorageBackend`] and handles the portable
//! JSON interchange format.
//!
//! Nothing here is fatal. Reads that fail for any reason (backend unavailable,
//! slot missing, bytes that do not decode) come back empty. Writes report a
//! `bool`. Failures are logged and never retried: the in-memory store stays
//! authoritative for the session.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use super::backend::StorageBackend;
use crate::error::{LedgerError, Result};
use crate::model::{Record, Settings, SettingsPatch};

/// Slot holding the JSON-encoded record list.
pub const RECORDS_KEY: &str = "finance:data:v1";
/// Slot holding the JSON-encoded settings object.
pub const SETTINGS_KEY: &str = "finance:settings:v1";

pub struct Persistence<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Persistence<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persisted records, or an empty list when there is nothing usable.
    ///
    /// A single undecodable element discards the whole list; the warning
    /// names its index.
    pub fn load(&self) -> Vec<Record> {
        let Some(bytes) = self.read_bytes(RECORDS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                match first_undecodable_record(&bytes) {
                    Some(index) => tracing::warn!(
                        key = RECORDS_KEY,
                        index,
                        error = %e,
                        "discarding records slot, element is not a valid record"
                    ),
                    None => tracing::warn!(
                        key = RECORDS_KEY,
                        error = %e,
                        "discarding undecodable slot"
                    ),
                }
                Vec::new()
            }
        }
    }

    pub fn save(&self, records: &[Record]) -> bool {
        self.write_slot(RECORDS_KEY, records)
    }

    /// Persisted settings keys, to be merged over the defaults.
    pub fn load_settings(&self) -> SettingsPatch {
        self.read_slot(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) -> bool {
        self.write_slot(SETTINGS_KEY, settings)
    }

    fn read_bytes(&self, key: &str) -> Option<Vec<u8>> {
        if !self.backend.is_available() {
            tracing::debug!(key, "storage unavailable, treating slot as empty");
            return None;
        }

        match self.backend.read(key) {
            Ok(Some(bytes)) if !bytes.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read slot");
                None
            }
        }
    }

    fn read_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.read_bytes(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding undecodable slot");
                None
            }
        }
    }

    fn write_slot<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        if !self.backend.is_available() {
            tracing::error!(key, "storage unavailable, changes not saved");
            return false;
        }

        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to encode slot");
                return false;
            }
        };

        match self.backend.write(key, &bytes) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to save slot");
                false
            }
        }
    }
}

/// Index of the first array element that does not decode as a [`Record`].
/// `None` when `bytes` is not a JSON array at all.
fn first_undecodable_record(bytes: &[u8]) -> Option<usize> {
    let items: Vec<Value> = serde_json::from_slice(bytes).ok()?;
    items
        .into_iter()
        .position(|item| serde_json::from_value::<Record>(item).is_err())
}

/// The document written by a full export.
#[derive(Debug, Serialize)]
pub struct ExportBundle<'a> {
    pub records: &'a [Record],
    pub settings: &'a Settings,
}

/// Pretty-printed (two-space indented) JSON for any exportable value.
pub fn export_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).map_err(LedgerError::Serialization)
}

/// Records and optional settings decoded from an interchange document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportData {
    pub records: Vec<Record>,
    pub settings: Option<SettingsPatch>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid JSON")]
    InvalidJson,

    #[error("JSON must include an array of records")]
    MissingRecords,

    #[error("{}", .0.join("; "))]
    InvalidRecords(Vec<String>),

    #[error("settings is not a valid settings object: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Clone, Copy)]
enum Expected {
    String,
    Number,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::String => write!(f, "string"),
            Expected::Number => write!(f, "number"),
        }
    }
}

const REQUIRED_FIELDS: [(&str, Expected); 5] = [
    ("id", Expected::String),
    ("description", Expected::String),
    ("amount", Expected::Number),
    ("category", Expected::String),
    ("date", Expected::String),
];

/// Decodes an interchange document: either a bare array of records or
/// `{ "records": [...], "settings": {...} }`.
///
/// Only presence and primitive type of the five required fields are checked.
/// Amount format and date shape are left to the validator.
pub fn import_json(text: &str) -> std::result::Result<ImportData, ImportError> {
    let parsed: Value = serde_json::from_str(text).map_err(|_| ImportError::InvalidJson)?;

    if is_falsy(&parsed) {
        return Err(ImportError::InvalidJson);
    }

    let (items, settings) = match &parsed {
        Value::Array(items) => (items, None),
        Value::Object(map) => match map.get("records") {
            Some(Value::Array(items)) => (items, map.get("settings")),
            _ => return Err(ImportError::MissingRecords),
        },
        _ => return Err(ImportError::MissingRecords),
    };

    let mut errors = Vec::new();
    for (i, item) in items.iter().enumerate() {
        for (field, expected) in REQUIRED_FIELDS {
            let ok = match (item.get(field), expected) {
                (Some(Value::String(_)), Expected::String) => true,
                (Some(Value::Number(_)), Expected::Number) => true,
                _ => false,
            };
            if !ok {
                errors.push(format!(
                    "record[{}].{} missing or not a {}",
                    i, field, expected
                ));
            }
        }
    }
    if !errors.is_empty() {
        return Err(ImportError::InvalidRecords(errors));
    }

    let records = items.iter().map(decode_record).collect();
    let settings = match settings {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<SettingsPatch>(value.clone())
                .map_err(|e| ImportError::InvalidSettings(e.to_string()))?,
        ),
    };

    Ok(ImportData { records, settings })
}

/// `null`, `false`, zero and the empty string are treated like unparsable text.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Builds a record from an element already known to carry the required fields.
fn decode_record(item: &Value) -> Record {
    let text = |field: &str| {
        item.get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let timestamp = |field: &str| {
        item.get(field)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now)
    };

    Record {
        id: text("id"),
        description: text("description"),
        amount: item
            .get("amount")
            .and_then(Value::as_f64)
            .unwrap_or(f64::NAN),
        category: text("category"),
        date: text("date"),
        created_at: timestamp("createdAt"),
        updated_at: timestamp("updatedAt"),
    }
}
