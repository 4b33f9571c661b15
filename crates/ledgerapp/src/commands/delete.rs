use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LedgerError, Result};
use crate::model::Record;
use crate::store::{LedgerStore, StorageBackend};

/// Deletes every record in `ids`. Fails before deleting anything if one of
/// them is unknown.
pub fn run<B: StorageBackend, I: AsRef<str>>(
    store: &mut LedgerStore<B>,
    ids: &[I],
) -> Result<CmdResult> {
    let mut targets: Vec<Record> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.as_ref();
        let record = store
            .get_record(id)
            .ok_or_else(|| LedgerError::RecordNotFound(id.to_string()))?;
        if !targets.iter().any(|r| r.id == record.id) {
            targets.push(record);
        }
    }

    let mut result = CmdResult::default();
    for record in targets {
        store.delete_record(&record.id);
        result.add_message(CmdMessage::success(format!(
            "Deleted ({}): {}",
            record.id, record.description
        )));
        result.affected_records.push(record);
    }
    Ok(result)
}
