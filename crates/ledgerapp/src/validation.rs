//! Field validation for ledger records.
//!
//! Every check is pure and never fails loudly: it reports a validity flag, the
//! normalized value where one exists, and a human-readable message.
//!
//! Rules:
//! - Description: whitespace runs collapse to one space, ends are trimmed, the
//!   result must not be empty
//! - Amount: `0` or a positive integer without a leading zero, optionally
//!   followed by one or two decimals
//! - Date: `YYYY-MM-DD` with month `01`-`12` and day `01`-`31`. Only the shape
//!   is checked, `2023-02-30` is accepted
//! - Category: letters, with single spaces or hyphens between words

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::model::Record;

static DESCRIPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S(?:.*\S)?$").unwrap());
static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:0|[1-9][0-9]*)(?:\.[0-9]{1,2})?$").unwrap());
static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12][0-9]|3[01])$").unwrap()
});
static CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(?:[ -][A-Za-z]+)*$").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").unwrap());

pub const DESCRIPTION_MESSAGE: &str = "Description cannot have leading/trailing spaces";
pub const AMOUNT_MESSAGE: &str = "Amount must be a number with up to 2 decimals";
pub const DATE_MESSAGE: &str = "Date must be YYYY-MM-DD";
pub const CATEGORY_MESSAGE: &str = "Category must be letters, spaces or hyphens";

/// Outcome of a single field check.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCheck<T> {
    pub valid: bool,
    pub value: Option<T>,
    pub message: Option<&'static str>,
}

impl<T> FieldCheck<T> {
    fn pass(value: T) -> Self {
        Self {
            valid: true,
            value: Some(value),
            message: None,
        }
    }

    fn fail(value: Option<T>, message: &'static str) -> Self {
        Self {
            valid: false,
            value,
            message: Some(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Description,
    Amount,
    Date,
    Category,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Date => "date",
            Field::Category => "category",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordValidation {
    pub ok: bool,
    pub errors: Vec<FieldError>,
}

impl RecordValidation {
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors.first()
    }
}

/// Raw, unvalidated record fields as typed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordForm {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl From<&Record> for RecordForm {
    fn from(record: &Record) -> Self {
        Self {
            description: record.description.clone(),
            amount: record.amount.to_string(),
            category: record.category.clone(),
            date: record.date.clone(),
        }
    }
}

pub fn normalize_description(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw, " ").trim().to_string()
}

pub fn validate_description(raw: &str) -> FieldCheck<String> {
    let value = normalize_description(raw);
    if DESCRIPTION.is_match(&value) {
        FieldCheck::pass(value)
    } else {
        FieldCheck::fail(Some(value), DESCRIPTION_MESSAGE)
    }
}

pub fn validate_amount(raw: &str) -> FieldCheck<f64> {
    if !AMOUNT.is_match(raw) {
        return FieldCheck::fail(None, AMOUNT_MESSAGE);
    }
    match raw.parse::<f64>() {
        Ok(value) => FieldCheck::pass(value),
        Err(_) => FieldCheck::fail(None, AMOUNT_MESSAGE),
    }
}

/// Structural check only: day-of-month is not checked against the month.
pub fn validate_date(raw: &str) -> FieldCheck<String> {
    if DATE.is_match(raw) {
        FieldCheck::pass(raw.to_string())
    } else {
        FieldCheck::fail(None, DATE_MESSAGE)
    }
}

pub fn validate_category(raw: &str) -> FieldCheck<String> {
    if CATEGORY.is_match(raw) {
        FieldCheck::pass(raw.to_string())
    } else {
        FieldCheck::fail(None, CATEGORY_MESSAGE)
    }
}

/// Runs every field check. Errors are reported in form order: description,
/// amount, date, category.
pub fn validate_record(form: &RecordForm) -> RecordValidation {
    let mut errors = Vec::new();

    if let Some(message) = validate_description(&form.description).message {
        errors.push(FieldError {
            field: Field::Description,
            message,
        });
    }
    if let Some(message) = validate_amount(&form.amount).message {
        errors.push(FieldError {
            field: Field::Amount,
            message,
        });
    }
    if let Some(message) = validate_date(&form.date).message {
        errors.push(FieldError {
            field: Field::Date,
            message,
        });
    }
    if let Some(message) = validate_category(&form.category).message {
        errors.push(FieldError {
            field: Field::Category,
            message,
        });
    }

    RecordValidation {
        ok: errors.is_empty(),
        errors,
    }
}

/// Returns the first word immediately repeated in `text` ("the the").
pub fn find_duplicate_word(text: &str) -> Option<&str> {
    let mut previous: Option<regex::Match<'_>> = None;
    for word in WORD.find_iter(text) {
        if let Some(prev) = previous {
            let gap = &text[prev.end()..word.start()];
            let separated_by_space = !gap.is_empty() && gap.chars().all(char::is_whitespace);
            if separated_by_space && prev.as_str() == word.as_str() {
                return Some(word.as_str());
            }
        }
        previous = Some(word);
    }
    None
}
