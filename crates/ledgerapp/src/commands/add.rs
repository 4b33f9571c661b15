use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NewRecord;
use crate::store::{LedgerStore, StorageBackend};
use crate::validation::{self, RecordForm};

/// Validates `form` and, when every field passes, adds the record.
///
/// Only the first failing field (form order) is reported.
pub fn run<B: StorageBackend>(store: &mut LedgerStore<B>, form: &RecordForm) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let Some(fields) = checked_fields(form, &mut result) else {
        return Ok(result);
    };

    if let Some(word) = validation::find_duplicate_word(&fields.description) {
        result.add_message(CmdMessage::warning(format!(
            "Description repeats the word \"{}\"",
            word
        )));
    }

    let record = store.add_record(fields);
    result.add_message(CmdMessage::success(format!(
        "Added Successfully: {}",
        record.description
    )));
    if !store.last_save_succeeded() {
        result.add_message(CmdMessage::warning("Could not save changes to storage"));
    }
    result.affected_records.push(record);
    Ok(result)
}

/// The validated, normalized record fields, or `None` after pushing the first
/// field error onto `result`.
pub(crate) fn checked_fields(form: &RecordForm, result: &mut CmdResult) -> Option<NewRecord> {
    let report = validation::validate_record(form);
    if let Some(error) = report.first_error() {
        result.add_message(CmdMessage::error(error.message));
        return None;
    }

    let amount = validation::validate_amount(&form.amount).value?;
    Some(NewRecord::new(
        validation::normalize_description(&form.description),
        amount,
        form.category.clone(),
        form.date.clone(),
    ))
}
