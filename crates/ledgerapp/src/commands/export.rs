use std::fs;
use std::path::Path;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LedgerError, Result};
use crate::store::{export_json, ExportBundle, LedgerStore, StorageBackend};

/// Default name for export files.
pub const EXPORT_FILE_NAME: &str = "finance-export.json";

/// Serializes `{ records, settings }` as pretty JSON, written to `output` when
/// given, otherwise returned in [`CmdResult::exported`].
pub fn run<B: StorageBackend>(
    store: &LedgerStore<B>,
    output: Option<&Path>,
) -> Result<CmdResult> {
    let state = store.state();
    let text = export_json(&ExportBundle {
        records: &state.records,
        settings: &state.settings,
    })?;

    let mut result = CmdResult::default();
    match output {
        Some(path) => {
            fs::write(path, &text).map_err(LedgerError::Io)?;
            tracing::debug!(path = %path.display(), "export written");
            result.add_message(CmdMessage::success(format!(
                "Exported {} record(s) to {}",
                state.records.len(),
                path.display()
            )));
        }
        None => result.exported = Some(text),
    }
    Ok(result)
}
