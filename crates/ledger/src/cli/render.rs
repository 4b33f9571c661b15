//! # Rendering
//!
//! Turns command results into terminal text. Layout math (column widths,
//! truncation) is Unicode-aware via `unicode-width`; colors come from
//! [`styles`](super::styles). Every function returns a `String` so output can
//! be tested without a terminal.

use chrono::NaiveDate;
use ledgerapp::commands::{CmdMessage, ListedRecord, MatchSegment, MessageLevel, Summary};
use ledgerapp::model::{Record, Settings};
use ledgerapp::stats::BudgetStatus;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::styles::{AMOUNT, BAR, CATEGORY, ERROR, HEADER, MATCH, MUTED, SUCCESS, WARNING};

pub const LINE_WIDTH: usize = 100;
const DATE_WIDTH: usize = 10;
const AMOUNT_WIDTH: usize = 12;
const CATEGORY_WIDTH: usize = 16;
const ID_WIDTH: usize = 18;
const GAP: &str = "  ";
const BAR_WIDTH: usize = 30;

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => MUTED.apply_to(&message.content).to_string(),
            MessageLevel::Success => SUCCESS.apply_to(&message.content).to_string(),
            MessageLevel::Warning => WARNING.apply_to(&message.content).to_string(),
            MessageLevel::Error => ERROR.apply_to(&message.content).to_string(),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn description_width() -> usize {
    let fixed = DATE_WIDTH + AMOUNT_WIDTH + CATEGORY_WIDTH + ID_WIDTH + GAP.len() * 4;
    LINE_WIDTH.saturating_sub(fixed)
}

/// Transaction table. Matched parts of descriptions are emphasized.
pub fn render_records(records: &[ListedRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let desc_width = description_width();
    let mut out = String::new();
    let header = format!(
        "{:<dw$}{GAP}{:<desc$}{GAP}{:>aw$}{GAP}{:<cw$}{GAP}{}",
        "Date",
        "Description",
        "Amount",
        "Category",
        "Id",
        dw = DATE_WIDTH,
        desc = desc_width,
        aw = AMOUNT_WIDTH,
        cw = CATEGORY_WIDTH,
    );
    out.push_str(&HEADER.apply_to(header.trim_end()).to_string());
    out.push('\n');

    for listed in records {
        let record = &listed.record;
        let (description, width) = fit_segments(&listed.segments, desc_width);
        let (category, category_width) = fit_plain(&record.category, CATEGORY_WIDTH);
        let (date, date_width) = fit_plain(&record.date, DATE_WIDTH);

        out.push_str(&format!(
            "{}{}{GAP}{}{}{GAP}{}{GAP}{}{}{GAP}{}\n",
            date,
            " ".repeat(DATE_WIDTH - date_width),
            description,
            " ".repeat(desc_width.saturating_sub(width)),
            AMOUNT.apply_to(format!("{:>w$}", format_money(record.amount), w = AMOUNT_WIDTH)),
            CATEGORY.apply_to(category),
            " ".repeat(CATEGORY_WIDTH.saturating_sub(category_width)),
            MUTED.apply_to(&record.id),
        ));
    }
    out
}

/// One line per created or modified record.
pub fn render_affected(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "  {}  {}  {}  {}  {}\n",
            MUTED.apply_to(&record.id),
            record.date,
            record.description,
            AMOUNT.apply_to(format_money(record.amount)),
            CATEGORY.apply_to(&record.category),
        ));
    }
    out
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    let top = summary.top_category.as_deref().unwrap_or("-");
    out.push_str(&format!("{:<16}{}\n", "Transactions", summary.count));
    out.push_str(&format!(
        "{:<16}{}\n",
        "Total",
        AMOUNT.apply_to(format_money(summary.total))
    ));
    out.push_str(&format!("{:<16}{}\n", "Top category", CATEGORY.apply_to(top)));
    out.push_str(&format!(
        "{:<16}{}\n",
        "Last 7 days",
        AMOUNT.apply_to(format_money(summary.last_week_total))
    ));

    out.push('\n');
    let max = summary.last7.iter().cloned().fold(1.0_f64, f64::max);
    for (day, value) in summary.last7_days.iter().zip(summary.last7.iter()) {
        let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        out.push_str(&format!(
            "  {:<9} {}{} {}\n",
            day_label(day),
            BAR.apply_to("█".repeat(filled)),
            " ".repeat(BAR_WIDTH - filled),
            format_money(*value),
        ));
    }

    if let Some(budget) = &summary.budget {
        out.push('\n');
        out.push_str(&render_budget(budget));
    }
    out
}

pub fn render_budget(budget: &BudgetStatus) -> String {
    let filled = ((budget.percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let bar_style = if budget.over_budget { &*ERROR } else { &*SUCCESS };

    let balance = if budget.balance >= 0.0 {
        format!("Balance {}", format_money(budget.balance))
    } else {
        format!("Balance -{}", format_money(budget.balance.abs()))
    };

    format!(
        "Spent {} of {}\n[{}{}] {:.0}%\n{}\n",
        format_money(budget.spent),
        format_money(budget.budget),
        bar_style.apply_to("█".repeat(filled)),
        "░".repeat(BAR_WIDTH - filled),
        budget.percent,
        balance,
    )
}

pub fn render_settings(settings: &Settings) -> String {
    let theme = settings
        .theme
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    let budget = settings
        .monthly_budget
        .map(format_money)
        .unwrap_or_else(|| "-".to_string());

    let mut out = String::new();
    for (key, value) in [
        ("base currency", settings.base_currency.clone()),
        ("rate EUR", settings.rates.eur.to_string()),
        ("rate GBP", settings.rates.gbp.to_string()),
        ("theme", theme),
        ("monthly budget", budget),
    ] {
        out.push_str(&format!("{:<16}{}\n", MUTED.apply_to(key), value));
    }
    out
}

pub fn format_money(value: f64) -> String {
    if value.is_nan() {
        return "n/a".to_string();
    }
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

fn day_label(day: &str) -> String {
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(|d| d.format("%a %m-%d").to_string())
        .unwrap_or_else(|_| day.to_string())
}

/// Fits styled segments into `max_width` columns, cutting with an ellipsis
/// when the text is too wide. Returns the rendered text and its width.
fn fit_segments(segments: &[MatchSegment], max_width: usize) -> (String, usize) {
    let total: usize = segments.iter().map(|s| s.text.width()).sum();
    let limit = if total > max_width {
        max_width.saturating_sub(1)
    } else {
        max_width
    };

    let mut out = String::new();
    let mut width = 0;
    for segment in segments {
        let mut piece = String::new();
        let mut cut = false;
        for c in segment.text.chars() {
            let c = if c.is_control() { ' ' } else { c };
            let char_width = c.width().unwrap_or(0);
            if width + char_width > limit {
                cut = true;
                break;
            }
            piece.push(c);
            width += char_width;
        }

        if segment.matched {
            out.push_str(&MATCH.apply_to(&piece).to_string());
        } else {
            out.push_str(&piece);
        }
        if cut {
            out.push('…');
            return (out, width + 1);
        }
    }
    (out, width)
}

fn fit_plain(text: &str, max_width: usize) -> (String, usize) {
    fit_segments(
        &[MatchSegment {
            text: text.to_string(),
            matched: false,
        }],
        max_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn plain(text: &str) -> MatchSegment {
        MatchSegment {
            text: text.into(),
            matched: false,
        }
    }

    fn record(description: &str, amount: f64) -> Record {
        Record {
            id: "txn_000001_1".into(),
            description: description.into(),
            amount,
            category: "Food".into(),
            date: "2024-03-01".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(3.5), "$3.50");
        assert_eq!(format_money(-12.0), "-$12.00");
        assert_eq!(format_money(f64::NAN), "n/a");
    }

    #[test]
    fn fit_keeps_short_text() {
        let (text, width) = fit_segments(&[plain("Coffee")], 10);
        assert_eq!(console::strip_ansi_codes(&text), "Coffee");
        assert_eq!(width, 6);
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        let (text, width) = fit_segments(&[plain("Coffee "), plain("beans")], 8);
        assert_eq!(console::strip_ansi_codes(&text), "Coffee …");
        assert_eq!(width, 8);
    }

    #[test]
    fn fit_counts_wide_characters() {
        let (text, width) = fit_plain("寿司寿司寿司", 7);
        assert_eq!(console::strip_ansi_codes(&text), "寿司寿…");
        assert_eq!(width, 7);
    }

    #[test]
    fn records_table_has_header_and_rows() {
        let listed = ListedRecord {
            record: record("Coffee", 3.5),
            highlighted: "Coffee".into(),
            segments: vec![plain("Coffee")],
        };
        let out = console::strip_ansi_codes(&render_records(&[listed])).to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Date"));
        assert!(lines[1].starts_with("2024-03-01  Coffee"));
        assert!(lines[1].contains("$3.50"));
        assert!(lines[1].ends_with("txn_000001_1"));
    }

    #[test]
    fn budget_shows_negative_balance() {
        let out = render_budget(&BudgetStatus {
            budget: 100.0,
            spent: 150.0,
            balance: -50.0,
            percent: 100.0,
            over_budget: true,
        });
        let out = console::strip_ansi_codes(&out).to_string();
        assert!(out.contains("Spent $150.00 of $100.00"));
        assert!(out.contains("100%"));
        assert!(out.contains("Balance -$50.00"));
    }

    #[test]
    fn summary_labels_days() {
        let summary = Summary {
            count: 1,
            total: 5.0,
            top_category: Some("Food".into()),
            last7: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0],
            last7_days: (9..=15).map(|d| format!("2024-03-{:02}", d)).collect(),
            last_week_total: 5.0,
            budget: None,
        };
        let out = console::strip_ansi_codes(&render_summary(&summary)).to_string();
        assert!(out.contains("Top category    Food"));
        assert!(out.contains("Fri 03-15"));
        assert!(out.contains("Sat 03-09"));
    }

    #[test]
    fn affected_lists_ids() {
        let out = render_affected(&[record("Tea", 2.0)]);
        assert!(console::strip_ansi_codes(&out).contains("txn_000001_1"));
    }
}
