use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NewRecord;
use crate::store::{import_json, LedgerStore, StorageBackend};

/// Replaces every record with the ones in `text`.
///
/// The document is checked completely before anything changes. On success all
/// existing records are cleared and each imported record is added again in
/// document order, getting a fresh id and timestamps. The last record of the
/// document therefore ends up first. Settings in the document are merged last.
pub fn run<B: StorageBackend>(store: &mut LedgerStore<B>, text: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let data = match import_json(text) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, "import rejected");
            result.add_message(CmdMessage::error(e.to_string()));
            return Ok(result);
        }
    };

    store.clear_all();
    for record in data.records {
        let added = store.add_record(NewRecord::from(record));
        result.affected_records.push(added);
    }

    match data.settings {
        Some(settings) => {
            store.save_settings(settings);
            result.add_message(CmdMessage::success(
                "Imported successfully (with settings)",
            ));
        }
        None => result.add_message(CmdMessage::success("Imported successfully")),
    }
    if !store.last_save_succeeded() {
        result.add_message(CmdMessage::warning("Could not save changes to storage"));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::export;
    use crate::model::{SettingsPatch, Theme};
    use crate::store::MemBackend;

    const TWO_RECORDS: &str = r#"[
        {"id":"a","description":"First","amount":1,"category":"Misc","date":"2024-01-01"},
        {"id":"b","description":"Second","amount":2,"category":"Misc","date":"2024-01-02"}
    ]"#;

    #[test]
    fn replaces_records_last_imported_first() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        store.add_record(NewRecord::new("Old", 9.0, "Misc", "2023-12-31"));

        let result = run(&mut store, TWO_RECORDS).unwrap();
        assert_eq!(result.messages[0].content, "Imported successfully");

        let descriptions: Vec<String> =
            store.records().into_iter().map(|r| r.description).collect();
        assert_eq!(descriptions, vec!["Second", "First"]);
    }

    #[test]
    fn imported_records_get_fresh_ids() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        run(&mut store, TWO_RECORDS).unwrap();
        assert!(store.records().iter().all(|r| r.id.starts_with("txn_")));
    }

    #[test]
    fn applies_settings_when_present() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        let text = r#"{"records":[],"settings":{"theme":"dark","monthlyBudget":300}}"#;
        let result = run(&mut store, text).unwrap();

        assert_eq!(
            result.messages[0].content,
            "Imported successfully (with settings)"
        );
        let settings = store.settings();
        assert_eq!(settings.theme, Some(Theme::Dark));
        assert_eq!(settings.monthly_budget, Some(300.0));
        assert_eq!(settings.base_currency, "USD");
    }

    #[test]
    fn rejected_document_changes_nothing() {
        let mut store = LedgerStore::with_backend(MemBackend::new());
        store.add_record(NewRecord::new("Keep", 1.0, "Misc", "2024-01-01"));

        for (text, message) in [
            ("not json", "Invalid JSON"),
            (r#"{"items":[]}"#, "JSON must include an array of records"),
            (
                r#"[{"id":"a","description":"x","amount":"1","category":"c","date":"d"}]"#,
                "record[0].amount missing or not a number",
            ),
        ] {
            let result = run(&mut store, text).unwrap();
            assert!(result.has_errors());
            assert_eq!(result.messages[0].content, message);
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn export_then_import_restores_content() {
        let mut source = LedgerStore::with_backend(MemBackend::new());
        source.add_record(NewRecord::new("Coffee", 3.5, "Food", "2024-03-01"));
        source.add_record(NewRecord::new("Bus", 2.0, "Transport", "2024-03-02"));
        source.save_settings(SettingsPatch {
            base_currency: Some("GBP".into()),
            ..Default::default()
        });
        let text = export::run(&source, None).unwrap().exported.unwrap();

        let mut target = LedgerStore::with_backend(MemBackend::new());
        run(&mut target, &text).unwrap();

        let mut got: Vec<(String, f64)> = target
            .records()
            .into_iter()
            .map(|r| (r.description, r.amount))
            .collect();
        got.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            got,
            vec![("Bus".to_string(), 2.0), ("Coffee".to_string(), 3.5)]
        );
        assert_eq!(target.settings(), source.settings());
    }
}
