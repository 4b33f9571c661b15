//! Styles for the ledger CLI.
//!
//! Code refers to styles by what the text *is* (an amount, a date, a match),
//! never by color. `console` drops the escape codes when stdout is not a
//! terminal, so piped output stays plain.

use console::Style;
use once_cell::sync::Lazy;

pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().dim());
pub static HEADER: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());
pub static MATCH: Lazy<Style> = Lazy::new(|| Style::new().bold().yellow());
pub static AMOUNT: Lazy<Style> = Lazy::new(|| Style::new().cyan());
pub static CATEGORY: Lazy<Style> = Lazy::new(|| Style::new().magenta());
pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow());
pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red());
pub static BAR: Lazy<Style> = Lazy::new(|| Style::new().blue());
