use serde::Serialize;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Record;
use crate::search::{self, Matcher, SortKey};
use crate::store::{LedgerStore, StorageBackend};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Plain pattern or `/pattern/flags`. Blank means no filtering.
    pub pattern: Option<String>,
    /// Drops the `i` flag from the default flags. Explicit `/p/flags` input
    /// is not affected.
    pub case_sensitive: bool,
    pub sort: SortKey,
}

/// A piece of a description, flagged when it matched the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSegment {
    pub text: String,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedRecord {
    pub record: Record,
    /// HTML-escaped description with `<mark>` around matches.
    pub highlighted: String,
    /// The raw description split at match boundaries. A single unmatched
    /// segment when no search is active.
    pub segments: Vec<MatchSegment>,
}

impl ListedRecord {
    fn new(record: Record, matcher: Option<&Matcher>) -> Self {
        let highlighted = search::highlight(&record.description, matcher);
        let segments = match matcher {
            Some(matcher) => matcher
                .segments(&record.description)
                .into_iter()
                .map(|s| MatchSegment {
                    text: s.text.to_string(),
                    matched: s.matched,
                })
                .collect(),
            None => vec![MatchSegment {
                text: record.description.clone(),
                matched: false,
            }],
        };
        Self {
            record,
            highlighted,
            segments,
        }
    }
}

pub fn run<B: StorageBackend>(
    store: &LedgerStore<B>,
    options: &ListOptions,
    default_flags: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let pattern = options.pattern.as_deref().map(str::trim).unwrap_or("");

    let flags = if options.case_sensitive {
        default_flags.replace('i', "")
    } else {
        default_flags.to_string()
    };

    let matcher = match search::compile_regex(pattern, &flags) {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::debug!(pattern, error = %e, "rejected search pattern");
            result.add_message(CmdMessage::error("Invalid regex"));
            result.add_message(CmdMessage::info(e.to_string()));
            return Ok(result);
        }
    };

    let mut records = search::filter_records(&store.records(), matcher.as_ref());
    search::sort_records(&mut records, options.sort);

    if records.is_empty() {
        let note = if matcher.is_some() {
            "No records match"
        } else {
            "No transactions yet"
        };
        result.add_message(CmdMessage::info(note));
    }

    let listed = records
        .into_iter()
        .map(|record| ListedRecord::new(record, matcher.as_ref()))
        .collect();
    Ok(result.with_listed_records(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::NewRecord;
    use crate::search::{SortDirection, SortField, DEFAULT_FLAGS};
    use crate::store::MemBackend;

    fn sample() -> LedgerStore<MemBackend> {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        store.add_record(NewRecord::new("Coffee beans", 14.0, "Groceries", "2024-03-02"));
        store.add_record(NewRecord::new("Bus ticket", 2.5, "Transport", "2024-03-05"));
        store.add_record(NewRecord::new("coffee <to go>", 3.0, "Food", "2024-03-01"));
        store
    }

    fn descriptions(result: &CmdResult) -> Vec<&str> {
        result
            .listed_records
            .iter()
            .map(|l| l.record.description.as_str())
            .collect()
    }

    #[test]
    fn default_listing_is_date_descending() {
        let store = sample();
        let result = run(&store, &ListOptions::default(), DEFAULT_FLAGS).unwrap();
        assert_eq!(
            descriptions(&result),
            vec!["Bus ticket", "Coffee beans", "coffee <to go>"]
        );
        assert!(result.listed_records[0].segments.iter().all(|s| !s.matched));
    }

    #[test]
    fn pattern_filters_case_insensitively_by_default() {
        let store = sample();
        let options = ListOptions {
            pattern: Some("coffee".into()),
            ..Default::default()
        };
        let result = run(&store, &options, DEFAULT_FLAGS).unwrap();
        assert_eq!(result.listed_records.len(), 2);
    }

    #[test]
    fn case_sensitive_drops_i_flag() {
        let store = sample();
        let options = ListOptions {
            pattern: Some("coffee".into()),
            case_sensitive: true,
            ..Default::default()
        };
        let result = run(&store, &options, DEFAULT_FLAGS).unwrap();
        assert_eq!(descriptions(&result), vec!["coffee <to go>"]);
    }

    #[test]
    fn pattern_matches_category_too() {
        let store = sample();
        let options = ListOptions {
            pattern: Some("^transport$".into()),
            ..Default::default()
        };
        let result = run(&store, &options, DEFAULT_FLAGS).unwrap();
        assert_eq!(descriptions(&result), vec!["Bus ticket"]);
    }

    #[test]
    fn highlights_are_escaped_and_segmented() {
        let store = sample();
        let options = ListOptions {
            pattern: Some("/go/".into()),
            ..Default::default()
        };
        let result = run(&store, &options, DEFAULT_FLAGS).unwrap();
        let listed = &result.listed_records[0];
        assert_eq!(listed.highlighted, "coffee &lt;to <mark>go</mark>&gt;");
        assert_eq!(
            listed.segments,
            vec![
                MatchSegment {
                    text: "coffee <to ".into(),
                    matched: false
                },
                MatchSegment {
                    text: "go".into(),
                    matched: true
                },
                MatchSegment {
                    text: ">".into(),
                    matched: false
                },
            ]
        );
    }

    #[test]
    fn invalid_pattern_reports_error_and_lists_nothing() {
        let store = sample();
        let options = ListOptions {
            pattern: Some("(".into()),
            ..Default::default()
        };
        let result = run(&store, &options, DEFAULT_FLAGS).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert_eq!(result.messages[0].content, "Invalid regex");
        assert!(result.listed_records.is_empty());
    }

    #[test]
    fn blank_pattern_lists_everything() {
        let store = sample();
        let options = ListOptions {
            pattern: Some("   ".into()),
            ..Default::default()
        };
        let result = run(&store, &options, DEFAULT_FLAGS).unwrap();
        assert_eq!(result.listed_records.len(), 3);
    }

    #[test]
    fn sorts_by_requested_key() {
        let store = sample();
        let options = ListOptions {
            sort: SortKey::new(SortField::Amount, SortDirection::Asc),
            ..Default::default()
        };
        let result = run(&store, &options, DEFAULT_FLAGS).unwrap();
        assert_eq!(
            descriptions(&result),
            vec!["Bus ticket", "coffee <to go>", "Coffee beans"]
        );
    }

    #[test]
    fn empty_store_notes_it() {
        let store = LedgerStore::with_backend(MemBackend::new());
        let result = run(&store, &ListOptions::default(), DEFAULT_FLAGS).unwrap();
        assert_eq!(result.messages[0].content, "No transactions yet");
    }
}
