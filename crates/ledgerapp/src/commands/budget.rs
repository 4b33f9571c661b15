use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{coerce_amount, SettingsPatch};
use crate::stats::BudgetStatus;
use crate::store::{LedgerStore, StorageBackend};

pub fn status<B: StorageBackend>(store: &LedgerStore<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match store.budget_status() {
        Some(budget) => {
            result.add_message(status_message(&budget));
            result.budget = Some(budget);
        }
        None => result.add_message(CmdMessage::info("No monthly budget set")),
    }
    Ok(result)
}

/// Sets the monthly budget from raw input. Anything that does not coerce to a
/// positive number is rejected and leaves settings untouched.
pub fn set<B: StorageBackend>(store: &mut LedgerStore<B>, raw: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let value = coerce_amount(raw);
    if !value.is_finite() || value <= 0.0 {
        result.add_message(CmdMessage::error("Budget must be a number greater than zero"));
        return Ok(result);
    }

    store.save_settings(SettingsPatch {
        monthly_budget: Some(value),
        ..Default::default()
    });
    result.add_message(CmdMessage::success(format!(
        "Monthly budget set to {:.2}",
        value
    )));
    if let Some(budget) = store.budget_status() {
        result.add_message(status_message(&budget));
        result.budget = Some(budget);
    }
    result.settings = Some(store.settings());
    Ok(result)
}

fn status_message(budget: &BudgetStatus) -> CmdMessage {
    if budget.over_budget {
        CmdMessage::warning("Budget exceeded")
    } else {
        CmdMessage::info("Under budget")
    }
}
