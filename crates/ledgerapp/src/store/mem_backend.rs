use super::backend::StorageBackend;
use crate::error::{LedgerError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the ledger is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    slots: RefCell<HashMap<String, Vec<u8>>>,
    writes: RefCell<usize>,
    simulate_write_error: RefCell<bool>,
    simulate_unavailable: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation (e.g. a full quota) for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Make the backend report itself unavailable.
    pub fn set_simulate_unavailable(&self, simulate: bool) {
        *self.simulate_unavailable.borrow_mut() = simulate;
    }

    /// Test helper to plant raw bytes in a slot, bypassing the write counter.
    pub fn put_raw(&self, key: &str, bytes: impl Into<Vec<u8>>) {
        self.slots.borrow_mut().insert(key.to_string(), bytes.into());
    }

    /// Raw slot contents as text, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots
            .borrow()
            .get(key)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl StorageBackend for MemBackend {
    fn is_available(&self) -> bool {
        !*self.simulate_unavailable.borrow()
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(LedgerError::Store("Simulated write error".to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), bytes.to_vec());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
