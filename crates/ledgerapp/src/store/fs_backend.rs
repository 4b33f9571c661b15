use super::backend::StorageBackend;
use crate::error::{LedgerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem backend: one JSON file per slot under a root directory.
///
/// Slot `finance:data:v1` lives in `<root>/finance_data_v1.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(slot_filename(key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(LedgerError::Io)?;
        }
        Ok(())
    }
}

fn slot_filename(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.json", safe)
}

impl StorageBackend for FsBackend {
    /// A missing root counts as available; it is created by the first write.
    fn is_available(&self) -> bool {
        self.root.is_dir() || !self.root.exists()
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(LedgerError::Io)?;
        Ok(Some(bytes))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_dir()?;
        let target = self.slot_path(key);

        // Atomic write
        let tmp = self.root.join(format!(".slot-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, bytes).map_err(LedgerError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(LedgerError::Io(e));
        }
        Ok(())
    }
}
