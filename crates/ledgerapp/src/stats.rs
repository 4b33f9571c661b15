//! Aggregate views over a record list: totals, top category, the seven-day
//! trend and budget tracking.
//!
//! `NaN` amounts count as zero everywhere in this module.

use chrono::{DateTime, Days, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{Record, Settings};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

pub fn total_amount(records: &[Record]) -> f64 {
    records.iter().map(Record::amount_or_zero).sum()
}

/// Category with the highest summed amount. Ties go to the category that
/// appears first in record order.
pub fn top_category(records: &[Record]) -> Option<String> {
    let mut sums: IndexMap<&str, f64> = IndexMap::new();
    for record in records {
        *sums.entry(record.category.as_str()).or_insert(0.0) += record.amount_or_zero();
    }

    let mut best: Option<(&str, f64)> = None;
    for (category, sum) in sums {
        match best {
            Some((_, top)) if sum <= top => {}
            _ => best = Some((category, sum)),
        }
    }
    best.map(|(category, _)| category.to_string())
}

/// Seven daily buckets ending at `now`, oldest first.
///
/// A record's date is read as midnight UTC. The bucket is the whole number of
/// 24h periods between that instant and `now` (truncated), not a local
/// calendar day. Records more than six periods back, in the future, or with an
/// unparsable date are ignored.
pub fn last7_totals(records: &[Record], now: DateTime<Utc>) -> [f64; 7] {
    let mut buckets = [0.0; 7];
    for record in records {
        let Some(day) = parse_day(&record.date) else {
            continue;
        };
        let diff = (now - day).num_milliseconds().div_euclid(DAY_MS);
        if (0..7).contains(&diff) {
            buckets[6 - diff as usize] += record.amount_or_zero();
        }
    }
    buckets
}

/// Midnight UTC of a `YYYY-MM-DD` date. A day past the end of its month
/// (up to 31) rolls into the next month, so `2023-02-30` is March 2nd.
fn parse_day(date: &str) -> Option<DateTime<Utc>> {
    let mut parts = date.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || year.len() != 4
        || month.len() != 2
        || day.len() != 2
        || !date.bytes().all(|b| b.is_ascii_digit() || b == b'-')
    {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    if !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_days(Days::new(u64::from(day - 1)))?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}

/// Spending measured against the monthly budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: f64,
    pub spent: f64,
    /// `budget - spent`, rounded to cents. Negative when over budget.
    pub balance: f64,
    /// Share of the budget spent, capped at 100.
    pub percent: f64,
    pub over_budget: bool,
}

/// `None` unless a positive monthly budget is configured. Spending reaching
/// the budget exactly counts as over budget.
pub fn budget_status(settings: &Settings, spent: f64) -> Option<BudgetStatus> {
    let budget = settings.monthly_budget.filter(|b| *b > 0.0)?;
    let percent = (spent / budget * 100.0).min(100.0);
    Some(BudgetStatus {
        budget,
        spent,
        balance: ((budget - spent) * 100.0).round() / 100.0,
        percent,
        over_budget: percent >= 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(category: &str, amount: f64, date: &str) -> Record {
        Record {
            id: format!("{}-{}", category, amount),
            description: "x".into(),
            amount,
            category: category.into(),
            date: date.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn total_ignores_nan() {
        let records = vec![
            record("A", 5.0, "2024-01-01"),
            record("A", f64::NAN, "2024-01-01"),
            record("B", 2.5, "2024-01-01"),
        ];
        assert_eq!(total_amount(&records), 7.5);
        assert_eq!(total_amount(&[]), 0.0);
    }

    #[test]
    fn top_category_sums_per_category() {
        let records = vec![
            record("A", 5.0, "2024-01-01"),
            record("B", 10.0, "2024-01-01"),
            record("A", 3.0, "2024-01-01"),
        ];
        assert_eq!(top_category(&records).as_deref(), Some("B"));
    }

    #[test]
    fn top_category_ties_go_to_first_seen() {
        let records = vec![
            record("Rent", 5.0, "2024-01-01"),
            record("Food", 5.0, "2024-01-01"),
        ];
        assert_eq!(top_category(&records).as_deref(), Some("Rent"));
    }

    #[test]
    fn top_category_empty_is_none() {
        assert_eq!(top_category(&[]), None);
    }

    #[test]
    fn last7_buckets_today_and_yesterday() {
        let now = noon(2024, 3, 15);
        let records = vec![
            record("A", 10.0, "2024-03-15"),
            record("A", 20.0, "2024-03-14"),
            record("A", 30.0, "2024-03-05"),
        ];
        let totals = last7_totals(&records, now);
        assert_eq!(totals, [0.0, 0.0, 0.0, 0.0, 0.0, 20.0, 10.0]);
    }

    #[test]
    fn last7_oldest_bucket_and_exclusions() {
        let now = noon(2024, 3, 15);
        let records = vec![
            record("A", 1.0, "2024-03-09"),
            record("A", 2.0, "2024-03-08"),
            record("A", 4.0, "2024-03-16"),
            record("A", 8.0, "not a date"),
            record("A", 16.0, "2024-02-30"),
        ];
        let totals = last7_totals(&records, now);
        assert_eq!(totals, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn last7_rolls_overflowing_days_into_next_month() {
        let now = noon(2024, 3, 2);
        let records = vec![
            record("A", 1.0, "2024-02-30"),
            record("A", 2.0, "2024-02-32"),
            record("A", 4.0, "2024-13-01"),
        ];
        assert_eq!(last7_totals(&records, now), [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(parse_day("2023-02-30"), parse_day("2023-03-02"));
        assert!(parse_day("2024-2-01").is_none());
        assert!(parse_day("2024-02-00").is_none());
    }

    #[test]
    fn last7_counts_whole_days_since_utc_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 30, 0).unwrap();
        let records = vec![record("A", 5.0, "2024-03-14")];
        assert_eq!(last7_totals(&records, now)[6], 0.0);
        assert_eq!(last7_totals(&records, now)[5], 5.0);
    }

    #[test]
    fn budget_absent_without_positive_budget() {
        assert!(budget_status(&Settings::default(), 10.0).is_none());
        let settings = Settings {
            monthly_budget: Some(0.0),
            ..Default::default()
        };
        assert!(budget_status(&settings, 10.0).is_none());
    }

    #[test]
    fn budget_under_and_over() {
        let settings = Settings {
            monthly_budget: Some(200.0),
            ..Default::default()
        };
        let under = budget_status(&settings, 50.0).unwrap();
        assert_eq!(under.percent, 25.0);
        assert_eq!(under.balance, 150.0);
        assert!(!under.over_budget);

        let over = budget_status(&settings, 250.5).unwrap();
        assert_eq!(over.percent, 100.0);
        assert_eq!(over.balance, -50.5);
        assert!(over.over_budget);

        assert!(budget_status(&settings, 200.0).unwrap().over_budget);
    }
}
