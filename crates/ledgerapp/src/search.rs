//! # Search
//!
//! User-typed patterns are compiled into a [`Matcher`] that filters record
//! lists and highlights the matched text.
//!
//! Two "no matcher" outcomes must stay distinguishable for callers:
//! - `Ok(None)`: the input was empty, search is inactive and everything is shown.
//! - `Err(SearchError)`: the input could not be compiled, the UI shows an error.
//!
//! A pattern may be written bare (`coffee`) or delimited with flags
//! (`/^cof+ee$/i`). Flags after the closing slash replace the default flags.
//!
//! [`highlight`] escapes HTML *before* matching, so a pattern meant to match
//! `&` has to match `&amp;`.

use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::model::Record;

pub const DEFAULT_FLAGS: &str = "i";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("unsupported regex flag '{0}'")]
    UnsupportedFlag(char),

    #[error("regex flag '{0}' given more than once")]
    RepeatedFlag(char),

    #[error("invalid regex: {0}")]
    InvalidPattern(String),
}

/// Compiled search pattern.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    flags: String,
}

impl Matcher {
    pub fn new(pattern: &str, flags: &str) -> Result<Self, SearchError> {
        let mut seen = Vec::with_capacity(flags.len());
        for flag in flags.chars() {
            if !matches!(flag, 'g' | 'i' | 'm' | 's' | 'u') {
                return Err(SearchError::UnsupportedFlag(flag));
            }
            if seen.contains(&flag) {
                return Err(SearchError::RepeatedFlag(flag));
            }
            seen.push(flag);
        }

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(seen.contains(&'i'))
            .multi_line(seen.contains(&'m'))
            .dot_matches_new_line(seen.contains(&'s'))
            .build()
            .map_err(|e| SearchError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            regex,
            flags: flags.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// A record matches when its description or its category does.
    pub fn matches_record(&self, record: &Record) -> bool {
        self.is_match(&record.description) || self.is_match(&record.category)
    }

    /// Splits `text` into alternating plain and matched pieces. Empty matches
    /// are skipped.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for m in self.regex.find_iter(text) {
            if m.start() == m.end() {
                continue;
            }
            if m.start() > cursor {
                segments.push(Segment::plain(&text[cursor..m.start()]));
            }
            segments.push(Segment::matched(m.as_str()));
            cursor = m.end();
        }
        if cursor < text.len() {
            segments.push(Segment::plain(&text[cursor..]));
        }
        segments
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.regex.as_str(), self.flags)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'t> {
    pub text: &'t str,
    pub matched: bool,
}

impl<'t> Segment<'t> {
    fn plain(text: &'t str) -> Self {
        Self {
            text,
            matched: false,
        }
    }

    fn matched(text: &'t str) -> Self {
        Self {
            text,
            matched: true,
        }
    }
}

/// Compiles user input into a matcher.
///
/// Returns `Ok(None)` for empty input (search inactive) and `Err` when the
/// pattern or its flags are invalid.
pub fn compile_regex(input: &str, default_flags: &str) -> Result<Option<Matcher>, SearchError> {
    if input.is_empty() {
        return Ok(None);
    }

    let (pattern, flags) = match split_delimited(input) {
        Some((pattern, flags)) if !flags.is_empty() => (pattern, flags),
        Some((pattern, _)) => (pattern, default_flags),
        None => (input, default_flags),
    };

    Matcher::new(pattern, flags).map(Some)
}

/// `/pattern/flags` is recognised when the input starts with a slash and
/// contains another one after it.
fn split_delimited(input: &str) -> Option<(&str, &str)> {
    if !input.starts_with('/') {
        return None;
    }
    let last = input.rfind('/')?;
    if last == 0 {
        return None;
    }
    Some((&input[1..last], &input[last + 1..]))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escapes `text`, then wraps every match found in the escaped text in
/// `<mark>` tags. The matched text is escaped a second time inside the tag,
/// so a match on `&` renders as `<mark>&amp;</mark>`.
pub fn highlight(text: &str, matcher: Option<&Matcher>) -> String {
    let escaped = escape_html(text);
    let Some(matcher) = matcher else {
        return escaped;
    };

    let mut out = String::with_capacity(escaped.len());
    for segment in matcher.segments(&escaped) {
        if segment.matched {
            out.push_str("<mark>");
            out.push_str(&escape_html(segment.text));
            out.push_str("</mark>");
        } else {
            out.push_str(segment.text);
        }
    }
    out
}

/// Keeps the records the matcher accepts; no matcher keeps everything.
pub fn filter_records(records: &[Record], matcher: Option<&Matcher>) -> Vec<Record> {
    match matcher {
        Some(matcher) => records
            .iter()
            .filter(|r| matcher.matches_record(r))
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Stable sort of a record listing. Dates compare lexically, which orders
/// well-formed `YYYY-MM-DD` strings chronologically.
pub fn sort_records(records: &mut [Record], key: SortKey) {
    records.sort_by(|a, b| {
        let ord = match key.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount_or_zero().total_cmp(&b.amount_or_zero()),
            SortField::Description => compare_text(&a.description, &b.description),
        };
        match key.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
