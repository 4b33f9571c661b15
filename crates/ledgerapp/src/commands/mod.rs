//! # Command Layer
//!
//! This module contains the **business logic** of the ledger. Each command lives in
//! its own submodule as a plain function over a [`LedgerStore`](crate::store::LedgerStore).
//!
//! ## Role and Responsibilities
//!
//! - Validate raw form input before it reaches the store
//! - Compile search patterns, filter, sort and highlight listings
//! - Assemble dashboard figures (summary, budget)
//! - Run the export/import flows
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: results are data, the client renders them
//! - **Argument parsing**: that's the CLI layer's job
//! - **Exit codes**: return `Result`, let the caller decide
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`]:
//! - `affected_records`: records created or modified by the command
//! - `listed_records`: records to display, with match segments for highlighting
//! - `summary`, `budget`, `settings`, `exported`: command-specific payloads
//! - `messages`: leveled messages (info, success, warning, error)
//!
//! Form validation failures are reported as error messages, not as `Err`:
//! the command ran, the input was rejected. `Err` is reserved for failures
//! such as an unknown record id or an unwritable export file.
//!
//! ## Testing Strategy
//!
//! Command tests run against `MemBackend` and cover every branch. This is
//! where most of the crate's behavioral tests live.

use serde::Serialize;

use crate::model::{Record, Settings};
use crate::stats::BudgetStatus;

pub mod add;
pub mod budget;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod settings;
pub mod summary;

pub use list::{ListOptions, ListedRecord, MatchSegment};
pub use summary::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<Record>,
    pub listed_records: Vec<ListedRecord>,
    pub summary: Option<Summary>,
    pub budget: Option<BudgetStatus>,
    pub settings: Option<Settings>,
    /// Serialized export document, when no output file was given.
    pub exported: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<ListedRecord>) -> Self {
        self.listed_records = records;
        self
    }

    /// Whether any message is an error, i.e. the command rejected its input.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_only_for_error_level() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::warning("careful"));
        assert!(!result.has_errors());
        result.add_message(CmdMessage::error("nope"));
        assert!(result.has_errors());
    }
}
