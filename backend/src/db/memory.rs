//! In-process `EntryStore` for tests. Mirrors the Postgres table's
//! `(user_id, entry_date)` unique index.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::entries::{DateRange, EntryFields, EntryStore, NewEntry};
use crate::error::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::services::day_window::DayWindow;
use crate::services::entries::ENTRY_NOT_FOUND;

#[derive(Clone, Default)]
pub struct MemoryEntryStore {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    fn apply(entry: &mut Entry, f: EntryFields) {
        entry.entry_date = f.entry_date;
        entry.mood_rating = f.mood_rating;
        entry.anxiety_level = f.anxiety_level;
        entry.sleep_hours = f.sleep_hours;
        entry.sleep_quality = f.sleep_quality;
        entry.stress_level = f.stress_level;
        entry.physical_activity = f.physical_activity;
        entry.activity_duration = f.activity_duration;
        entry.social_interaction = f.social_interaction;
        entry.depression_symptoms = f.depression_symptoms;
        entry.anxiety_symptoms = f.anxiety_symptoms;
        entry.depression_symptom_severity = f.depression_symptom_severity;
        entry.anxiety_symptom_severity = f.anxiety_symptom_severity;
        entry.notes = f.notes;
    }
}

impl EntryStore for MemoryEntryStore {
    async fn find_in_window(&self, owner: Uuid, window: DayWindow) -> AppResult<Option<Entry>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .find(|e| e.user_id == owner && window.contains(e.entry_date))
            .cloned())
    }

    async fn insert(&self, new: NewEntry) -> AppResult<Entry> {
        let mut entries = self.entries.lock().await;
        if entries
            .iter()
            .any(|e| e.user_id == new.user_id && e.entry_date == new.fields.entry_date)
        {
            return Err(AppError::DuplicateEntry(new.fields.entry_date.date()));
        }

        let now = Utc::now();
        let mut entry = Entry {
            id: new.id,
            user_id: new.user_id,
            entry_date: new.fields.entry_date,
            mood_rating: 0,
            anxiety_level: 0,
            sleep_hours: 0.0,
            sleep_quality: 0,
            stress_level: 0,
            physical_activity: Default::default(),
            activity_duration: 0,
            social_interaction: 0,
            depression_symptoms: false,
            anxiety_symptoms: false,
            depression_symptom_severity: 0,
            anxiety_symptom_severity: 0,
            notes: None,
            recommendation: new.recommendation,
            created_at: now,
            updated_at: now,
        };
        Self::apply(&mut entry, new.fields);
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_id(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Entry>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .find(|e| e.id == id && e.user_id == owner)
            .cloned())
    }

    async fn update(&self, owner: Uuid, id: Uuid, fields: EntryFields) -> AppResult<Entry> {
        let mut entries = self.entries.lock().await;
        if entries
            .iter()
            .any(|e| e.id != id && e.user_id == owner && e.entry_date == fields.entry_date)
        {
            return Err(AppError::DuplicateEntry(fields.entry_date.date()));
        }

        let entry = entries
            .iter_mut()
            .find(|e| e.id == id && e.user_id == owner)
            .ok_or_else(|| AppError::NotFound(ENTRY_NOT_FOUND.into()))?;
        Self::apply(entry, fields);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<bool> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.user_id == owner));
        Ok(entries.len() < before)
    }

    async fn list_by_owner(&self, owner: Uuid, range: DateRange) -> AppResult<Vec<Entry>> {
        let entries = self.entries.lock().await;
        let mut owned: Vec<Entry> = entries
            .iter()
            .filter(|e| e.user_id == owner && range.contains(e.entry_date))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        Ok(owned)
    }
}
