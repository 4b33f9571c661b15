use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LedgerError, Result};
use crate::model::RecordUpdate;
use crate::store::{LedgerStore, StorageBackend};
use crate::validation::{self, FieldCheck};

/// Raw replacement values for an existing record. Absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

pub fn run<B: StorageBackend>(
    store: &mut LedgerStore<B>,
    id: &str,
    edit: &RecordEdit,
) -> Result<CmdResult> {
    if store.get_record(id).is_none() {
        return Err(LedgerError::RecordNotFound(id.to_string()));
    }

    let mut result = CmdResult::default();
    let update = match checked_update(edit) {
        Ok(update) => update,
        Err(message) => {
            result.add_message(CmdMessage::error(message));
            return Ok(result);
        }
    };

    if update.is_empty() {
        result.add_message(CmdMessage::info("Nothing to update"));
        return Ok(result);
    }

    let record = store
        .update_record(id, update)
        .ok_or_else(|| LedgerError::RecordNotFound(id.to_string()))?;
    result.add_message(CmdMessage::success(format!(
        "Updated Successfully: {}",
        record.description
    )));
    if !store.last_save_succeeded() {
        result.add_message(CmdMessage::warning("Could not save changes to storage"));
    }
    result.affected_records.push(record);
    Ok(result)
}

fn checked_update(edit: &RecordEdit) -> std::result::Result<RecordUpdate, &'static str> {
    fn check<T>(
        raw: Option<&String>,
        rule: fn(&str) -> FieldCheck<T>,
    ) -> std::result::Result<Option<T>, &'static str> {
        match raw {
            None => Ok(None),
            Some(raw) => {
                let check = rule(raw);
                match (check.valid, check.value) {
                    (true, Some(value)) => Ok(Some(value)),
                    _ => Err(check.message.unwrap_or("Invalid value")),
                }
            }
        }
    }

    let description = check(edit.description.as_ref(), validation::validate_description)?;
    let amount = check(edit.amount.as_ref(), validation::validate_amount)?;
    let date = check(edit.date.as_ref(), validation::validate_date)?;
    let category = check(edit.category.as_ref(), validation::validate_category)?;

    Ok(RecordUpdate {
        description,
        amount,
        category,
        date,
    })
}
