use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::commands::CmdResult;
use crate::error::Result;
use crate::stats::BudgetStatus;
use crate::store::{LedgerStore, StorageBackend};

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub top_category: Option<String>,
    /// Oldest first, today last.
    pub last7: [f64; 7],
    /// UTC dates labelling `last7`, formatted `YYYY-MM-DD`.
    pub last7_days: Vec<String>,
    pub last_week_total: f64,
    pub budget: Option<BudgetStatus>,
}

pub fn run<B: StorageBackend>(store: &LedgerStore<B>) -> Result<CmdResult> {
    run_at(store, Utc::now())
}

pub fn run_at<B: StorageBackend>(
    store: &LedgerStore<B>,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let last7 = store.last7_totals_at(now);
    let today = now.date_naive();
    let last7_days = (0..7)
        .rev()
        .map(|back| (today - Duration::days(back)).format("%Y-%m-%d").to_string())
        .collect();

    let summary = Summary {
        count: store.len(),
        total: store.total_amount(),
        top_category: store.top_category(),
        last7,
        last7_days,
        last_week_total: last7.iter().sum(),
        budget: store.budget_status(),
    };

    Ok(CmdResult {
        budget: summary.budget.clone(),
        summary: Some(summary),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewRecord, SettingsPatch};
    use crate::store::MemBackend;
    use chrono::TimeZone;

    #[test]
    fn summarizes_records() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        store.add_record(NewRecord::new("Rent", 800.0, "Housing", "2024-03-01"));
        store.add_record(NewRecord::new("Lunch", 12.0, "Food", "2024-03-14"));
        store.add_record(NewRecord::new("Dinner", 20.0, "Food", "2024-03-15"));

        let now = Utc.with_ymd_and_hms(2024, 3, 15, 18, 0, 0).unwrap();
        let result = run_at(&store, now).unwrap();
        let summary = result.summary.unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, 832.0);
        assert_eq!(summary.top_category.as_deref(), Some("Housing"));
        assert_eq!(summary.last7, [0.0, 0.0, 0.0, 0.0, 0.0, 12.0, 20.0]);
        assert_eq!(summary.last_week_total, 32.0);
        assert_eq!(summary.last7_days.first().map(String::as_str), Some("2024-03-09"));
        assert_eq!(summary.last7_days.last().map(String::as_str), Some("2024-03-15"));
        assert!(summary.budget.is_none());
    }

    #[test]
    fn empty_store_has_no_top_category() {
        let store = LedgerStore::with_backend(MemBackend::new());
        let summary = run(&store).unwrap().summary.unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total, 0.0);
        assert!(summary.top_category.is_none());
    }

    #[test]
    fn includes_budget_when_set() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        store.save_settings(SettingsPatch {
            monthly_budget: Some(100.0),
            ..Default::default()
        });
        store.add_record(NewRecord::new("Lunch", 40.0, "Food", "2024-03-14"));

        let result = run(&store).unwrap();
        let budget = result.budget.unwrap();
        assert_eq!(budget.percent, 40.0);
        assert_eq!(result.summary.unwrap().budget, Some(budget));
    }
}
