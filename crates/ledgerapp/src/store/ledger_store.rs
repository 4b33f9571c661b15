use chrono::{DateTime, Utc};
use std::rc::Rc;

use super::backend::StorageBackend;
use super::persistence::Persistence;
use crate::model::{NewRecord, Record, RecordUpdate, Settings, SettingsPatch, StoreState};
use crate::stats::{self, BudgetStatus};

/// What a subscriber returns. An `Err` is logged and does not stop the
/// remaining subscribers from running.
pub type SubscriberResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Change callback. Receives a full snapshot after every mutation.
///
/// Subscribers are compared by `Rc` identity: registering a clone of an
/// already registered `Rc` is a no-op.
pub type Subscriber = Rc<dyn Fn(&StoreState) -> SubscriberResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The in-memory authority for records and settings.
///
/// Every mutation runs to completion before returning: change memory, mirror
/// to the backend, notify subscribers. Nothing outside the store holds a
/// reference into its state; readers get owned copies.
///
/// Subscribers run synchronously while the store is mutably borrowed and must
/// not call back into it.
pub struct LedgerStore<B: StorageBackend> {
    persistence: Persistence<B>,
    records: Vec<Record>,
    settings: Settings,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    id_counter: u64,
    last_save_ok: bool,
}

impl<B: StorageBackend> LedgerStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            persistence: Persistence::new(backend),
            records: Vec::new(),
            settings: Settings::default(),
            subscribers: Vec::new(),
            next_subscription: 1,
            id_counter: 1,
            last_save_ok: true,
        }
    }

    pub fn persistence(&self) -> &Persistence<B> {
        &self.persistence
    }

    /// Loads persisted settings and records.
    ///
    /// Persisted records win when there are any. Otherwise a non-empty `seed`
    /// is adopted and persisted. Subscribers are always notified.
    pub fn init(&mut self, seed: Vec<Record>) {
        let persisted_settings = self.persistence.load_settings();
        if !persisted_settings.is_empty() {
            self.settings.merge(persisted_settings);
        }

        let loaded = self.persistence.load();
        if !loaded.is_empty() {
            tracing::debug!(count = loaded.len(), "adopted persisted records");
            self.records = loaded;
        } else if !seed.is_empty() {
            tracing::debug!(count = seed.len(), "adopted seed records");
            self.records = seed;
            self.persist_records();
        }

        self.notify();
    }

    pub fn state(&self) -> StoreState {
        StoreState {
            records: self.records.clone(),
            settings: self.settings.clone(),
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings.clone()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.clone()
    }

    pub fn get_record(&self, id: &str) -> Option<Record> {
        self.records.iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the most recent write to the backend succeeded.
    pub fn last_save_succeeded(&self) -> bool {
        self.last_save_ok
    }

    /// Inserts a new record at the front. No field validation happens here.
    pub fn add_record(&mut self, fields: NewRecord) -> Record {
        let now = Utc::now();
        let record = Record {
            id: self.generate_id(now),
            description: fields.description.trim().to_string(),
            amount: fields.amount,
            category: fields.category,
            date: fields.date,
            created_at: now,
            updated_at: now,
        };

        self.records.insert(0, record.clone());
        tracing::debug!(id = %record.id, "record added");
        self.persist_records();
        self.notify();
        record
    }

    /// Merges `updates` over the record with `id`. Returns `None` without
    /// persisting or notifying when no such record exists.
    pub fn update_record(&mut self, id: &str, updates: RecordUpdate) -> Option<Record> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        updates.apply_to(record);
        record.updated_at = Utc::now().max(record.updated_at);
        let updated = record.clone();

        tracing::debug!(id, "record updated");
        self.persist_records();
        self.notify();
        Some(updated)
    }

    /// Removes the record with `id`. Persists and notifies only when
    /// something was removed.
    pub fn delete_record(&mut self, id: &str) -> bool {
        let Some(idx) = self.records.iter().position(|r| r.id == id) else {
            return false;
        };
        self.records.remove(idx);

        tracing::debug!(id, "record deleted");
        self.persist_records();
        self.notify();
        true
    }

    pub fn clear_all(&mut self) {
        self.records.clear();
        tracing::debug!("all records cleared");
        self.persist_records();
        self.notify();
    }

    /// Shallow-merges `patch` into the current settings, persists, notifies.
    pub fn save_settings(&mut self, patch: SettingsPatch) {
        self.settings.merge(patch);
        self.last_save_ok = self.persistence.save_settings(&self.settings);
        self.notify();
    }

    /// Registers `callback`. The returned id unsubscribes it. Registering the
    /// same `Rc` again returns the original id.
    pub fn subscribe(&mut self, callback: Subscriber) -> SubscriptionId {
        if let Some((id, _)) = self
            .subscribers
            .iter()
            .find(|(_, existing)| Rc::ptr_eq(existing, &callback))
        {
            return *id;
        }

        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, callback));
        id
    }

    /// Returns whether a subscription was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn total_amount(&self) -> f64 {
        stats::total_amount(&self.records)
    }

    pub fn top_category(&self) -> Option<String> {
        stats::top_category(&self.records)
    }

    pub fn last7_totals(&self) -> [f64; 7] {
        self.last7_totals_at(Utc::now())
    }

    pub fn last7_totals_at(&self, now: DateTime<Utc>) -> [f64; 7] {
        stats::last7_totals(&self.records, now)
    }

    pub fn budget_status(&self) -> Option<BudgetStatus> {
        stats::budget_status(&self.settings, self.total_amount())
    }

    /// `txn_<last six digits of epoch millis>_<counter>`, bumped until it is
    /// unused in this store.
    fn generate_id(&mut self, now: DateTime<Utc>) -> String {
        let stamp = now.timestamp_millis().rem_euclid(1_000_000);
        loop {
            let id = format!("txn_{:06}_{}", stamp, self.id_counter);
            self.id_counter += 1;
            if !self.records.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }

    fn persist_records(&mut self) {
        self.last_save_ok = self.persistence.save(&self.records);
    }

    fn notify(&self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.state();
        for (id, callback) in &self.subscribers {
            if let Err(e) = callback(&snapshot) {
                tracing::error!(subscription = id.0, error = %e, "subscriber failed");
            }
        }
    }
}
