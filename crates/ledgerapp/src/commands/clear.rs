use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{LedgerStore, StorageBackend};

/// Removes every record. Settings are kept.
pub fn run<B: StorageBackend>(store: &mut LedgerStore<B>) -> Result<CmdResult> {
    let removed = store.records();
    store.clear_all();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Cleared {} record(s)",
        removed.len()
    )));
    Ok(result.with_affected_records(removed))
}
