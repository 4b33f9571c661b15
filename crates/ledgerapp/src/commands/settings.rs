use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Rates, SettingsPatch, Theme};
use crate::store::{LedgerStore, StorageBackend};

/// Raw settings input. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub base_currency: Option<String>,
    pub eur_rate: Option<String>,
    pub gbp_rate: Option<String>,
    pub theme: Option<Theme>,
}

pub fn show<B: StorageBackend>(store: &LedgerStore<B>) -> Result<CmdResult> {
    Ok(CmdResult {
        settings: Some(store.settings()),
        ..Default::default()
    })
}

/// Applies `update` as one shallow merge. Rates are saved as a pair: a rate
/// that is not supplied keeps its current value, a blank one becomes 1.
pub fn update<B: StorageBackend>(
    store: &mut LedgerStore<B>,
    update: &SettingsUpdate,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let current = store.settings();
    let mut patch = SettingsPatch::default();

    if let Some(code) = &update.base_currency {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            result.add_message(CmdMessage::error(
                "Currency must be a three-letter code such as USD",
            ));
            return Ok(result);
        }
        patch.base_currency = Some(code);
    }

    if update.eur_rate.is_some() || update.gbp_rate.is_some() {
        let eur = match parse_rate(update.eur_rate.as_deref(), current.rates.eur) {
            Some(rate) => rate,
            None => return Ok(rate_error(result)),
        };
        let gbp = match parse_rate(update.gbp_rate.as_deref(), current.rates.gbp) {
            Some(rate) => rate,
            None => return Ok(rate_error(result)),
        };
        patch.rates = Some(Rates { eur, gbp });
    }

    patch.theme = update.theme;

    if patch.is_empty() {
        result.add_message(CmdMessage::info("Nothing to update"));
    } else {
        store.save_settings(patch);
        result.add_message(CmdMessage::success("Settings Saved Successfully"));
        if !store.last_save_succeeded() {
            result.add_message(CmdMessage::warning("Could not save changes to storage"));
        }
    }
    result.settings = Some(store.settings());
    Ok(result)
}

fn parse_rate(raw: Option<&str>, current: f64) -> Option<f64> {
    let Some(raw) = raw else {
        return Some(current);
    };
    if raw.trim().is_empty() {
        return Some(1.0);
    }
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}

fn rate_error(mut result: CmdResult) -> CmdResult {
    result.add_message(CmdMessage::error("Exchange rates must be positive numbers"));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemBackend;

    #[test]
    fn show_returns_defaults() {
        let store = LedgerStore::with_backend(MemBackend::new());
        let settings = show(&store).unwrap().settings.unwrap();
        assert_eq!(settings.base_currency, "USD");
        assert_eq!(settings.rates, Rates::default());
    }

    #[test]
    fn updates_currency_and_rates_together() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        let result = update(
            &mut store,
            &SettingsUpdate {
                base_currency: Some("eur".into()),
                gbp_rate: Some("0.86".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!result.has_errors());
        let settings = store.settings();
        assert_eq!(settings.base_currency, "EUR");
        assert_eq!(settings.rates, Rates { eur: 1.0, gbp: 0.86 });
    }

    #[test]
    fn blank_rate_falls_back_to_one() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        update(
            &mut store,
            &SettingsUpdate {
                eur_rate: Some("0.9".into()),
                gbp_rate: Some("0.8".into()),
                ..Default::default()
            },
        )
        .unwrap();
        update(
            &mut store,
            &SettingsUpdate {
                eur_rate: Some(" ".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(store.settings().rates, Rates { eur: 1.0, gbp: 0.8 });
    }

    #[test]
    fn rejects_bad_input_without_saving() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        let bad_rate = update(
            &mut store,
            &SettingsUpdate {
                base_currency: Some("GBP".into()),
                eur_rate: Some("lots".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(bad_rate.has_errors());

        let bad_code = update(
            &mut store,
            &SettingsUpdate {
                base_currency: Some("Pounds".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(bad_code.has_errors());
        assert_eq!(store.settings().base_currency, "USD");
        assert_eq!(store.persistence().backend().write_count(), 0);
    }

    #[test]
    fn sets_theme() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        update(
            &mut store,
            &SettingsUpdate {
                theme: Some(Theme::Dark),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(store.settings().theme, Some(Theme::Dark));
    }

    #[test]
    fn empty_update_saves_nothing() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        let result = update(&mut store, &SettingsUpdate::default()).unwrap();
        assert_eq!(result.messages[0].content, "Nothing to update");
        assert_eq!(store.persistence().backend().write_count(), 0);
    }
}
