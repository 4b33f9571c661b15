use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single financial transaction.
///
/// Serialized in camelCase (`createdAt`, `updatedAt`), the field names used
/// by the storage slots and export files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub description: String,
    /// `NaN` is representable here (it is written as `null`); the store accepts
    /// whatever the caller coerced, validation happens before submission.
    #[serde(deserialize_with = "amount_or_nan")]
    pub amount: f64,
    pub category: String,
    pub date: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn amount_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Record {
    /// Amount as used by the aggregates: `NaN` counts as zero.
    pub fn amount_or_zero(&self) -> f64 {
        if self.amount.is_nan() {
            0.0
        } else {
            self.amount
        }
    }
}

/// Fields supplied when creating a record. The id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewRecord {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

impl NewRecord {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date: date.into(),
        }
    }

    /// Build from raw form text, coercing the amount the lenient way
    /// (see [`coerce_amount`]).
    pub fn from_raw(description: &str, amount: &str, category: &str, date: &str) -> Self {
        Self::new(description, coerce_amount(amount), category, date)
    }
}

impl From<Record> for NewRecord {
    fn from(record: Record) -> Self {
        Self {
            description: record.description,
            amount: record.amount,
            category: record.category,
            date: record.date,
        }
    }
}

/// Lenient numeric coercion: blank text is zero, anything that is not a plain
/// decimal is `NaN`. Spelled-out values such as `inf` or `NaN` count as
/// unparsable.
pub fn coerce_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let plain = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'));
    if !plain {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Partial update merged over an existing record. `None` leaves the field as is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordUpdate {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    pub(crate) fn apply_to(&self, record: &mut Record) {
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(amount) = self.amount {
            record.amount = amount;
        }
        if let Some(category) = &self.category {
            record.category = category.clone();
        }
        if let Some(date) = &self.date {
            record.date = date.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

fn unit_rate() -> f64 {
    1.0
}

/// Exchange rates relative to the base currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    #[serde(rename = "EUR", default = "unit_rate")]
    pub eur: f64,
    #[serde(rename = "GBP", default = "unit_rate")]
    pub gbp: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self { eur: 1.0, gbp: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_currency: String,
    pub rates: Rates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            rates: Rates::default(),
            theme: None,
            monthly_budget: None,
        }
    }
}

impl Settings {
    /// Shallow merge: every key present in `patch` replaces the current value.
    /// `rates` is replaced as a whole, never merged per currency.
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(base_currency) = patch.base_currency {
            self.base_currency = base_currency;
        }
        if let Some(rates) = patch.rates {
            self.rates = rates;
        }
        if let Some(theme) = patch.theme {
            self.theme = Some(theme);
        }
        if let Some(monthly_budget) = patch.monthly_budget {
            self.monthly_budget = Some(monthly_budget);
        }
    }
}

/// The top-level keys of [`Settings`], each optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates: Option<Rates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<f64>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.base_currency.is_none()
            && self.rates.is_none()
            && self.theme.is_none()
            && self.monthly_budget.is_none()
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            base_currency: Some(settings.base_currency),
            rates: Some(settings.rates),
            theme: settings.theme,
            monthly_budget: settings.monthly_budget,
        }
    }
}

/// Snapshot of everything the store owns. Handed to subscribers and callers
/// by value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreState {
    pub records: Vec<Record>,
    pub settings: Settings,
}
