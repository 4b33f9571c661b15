use crate::error::Result;

/// Abstract interface for raw slot I/O.
///
/// A backend is a byte-oriented key-value store: it knows nothing about
/// records or settings. [`Persistence`](super::persistence::Persistence)
/// handles the "what" (encoding, tolerance of bad data), the backend the "how"
/// (filesystem vs memory).
pub trait StorageBackend {
    /// Whether the backend can be used at all (e.g. its root directory can be
    /// created). An unavailable backend reads as empty.
    fn is_available(&self) -> bool;

    /// Read the bytes stored under `key`.
    /// Returns Ok(None) if the slot was never written.
    /// Returns Err only on actual I/O errors.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the bytes stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) so a failed write leaves
    /// the previous value intact.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;
}
