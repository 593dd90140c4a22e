use std::future::Future;

use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::entry::{ActivityCategory, Entry, EntryInput};
use crate::services::day_window::{normalize_to_midnight, DayWindow};
use crate::services::entries::ENTRY_NOT_FOUND;

/// Mutable entry columns, with the date already normalized to midnight.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFields {
    pub entry_date: NaiveDateTime,
    pub mood_rating: i32,
    pub anxiety_level: i32,
    pub sleep_hours: f64,
    pub sleep_quality: i32,
    pub stress_level: i32,
    pub physical_activity: ActivityCategory,
    pub activity_duration: i32,
    pub social_interaction: i32,
    pub depression_symptoms: bool,
    pub anxiety_symptoms: bool,
    pub depression_symptom_severity: i32,
    pub anxiety_symptom_severity: i32,
    pub notes: Option<String>,
}

impl From<&EntryInput> for EntryFields {
    fn from(input: &EntryInput) -> Self {
        Self {
            entry_date: normalize_to_midnight(input.date.local()),
            mood_rating: input.mood_rating,
            anxiety_level: input.anxiety_level,
            sleep_hours: input.sleep_hours,
            sleep_quality: input.sleep_quality,
            stress_level: input.stress_level,
            physical_activity: input.physical_activity,
            activity_duration: input.activity_duration,
            social_interaction: input.social_interaction,
            depression_symptoms: input.depression_symptoms,
            anxiety_symptoms: input.anxiety_symptoms,
            depression_symptom_severity: input.depression_symptom_severity,
            anxiety_symptom_severity: input.anxiety_symptom_severity,
            notes: input.notes.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub fields: EntryFields,
    pub recommendation: Option<String>,
}

/// Optional half-open `[start, end)` filter on `entry_date`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    #[cfg(test)]
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts < e)
    }
}

/// Entry persistence. Every lookup is scoped to the owner so a foreign id
/// behaves exactly like a missing one.
pub trait EntryStore {
    fn find_in_window(
        &self,
        owner: Uuid,
        window: DayWindow,
    ) -> impl Future<Output = AppResult<Option<Entry>>> + Send;

    fn insert(&self, entry: NewEntry) -> impl Future<Output = AppResult<Entry>> + Send;

    fn find_by_id(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AppResult<Option<Entry>>> + Send;

    fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: EntryFields,
    ) -> impl Future<Output = AppResult<Entry>> + Send;

    /// Returns false when nothing owned by `owner` had that id.
    fn delete(&self, owner: Uuid, id: Uuid) -> impl Future<Output = AppResult<bool>> + Send;

    /// Newest first.
    fn list_by_owner(
        &self,
        owner: Uuid,
        range: DateRange,
    ) -> impl Future<Output = AppResult<Vec<Entry>>> + Send;
}

#[derive(Clone)]
pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// The `(user_id, entry_date)` unique index backs up the read-then-write
/// check in the service, which alone cannot stop two racing creates.
fn map_day_conflict(err: sqlx::Error, entry_date: NaiveDateTime) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::DuplicateEntry(entry_date.date())
        }
        _ => AppError::Database(err),
    }
}

impl EntryStore for PgEntryStore {
    async fn find_in_window(&self, owner: Uuid, window: DayWindow) -> AppResult<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM entries
            WHERE user_id = $1 AND entry_date >= $2 AND entry_date < $3
            LIMIT 1
            "#,
        )
        .bind(owner)
        .bind(window.start)
        .bind(window.end)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    async fn insert(&self, entry: NewEntry) -> AppResult<Entry> {
        let f = &entry.fields;
        sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (
                id, user_id, entry_date, mood_rating, anxiety_level, sleep_hours,
                sleep_quality, stress_level, physical_activity, activity_duration,
                social_interaction, depression_symptoms, anxiety_symptoms,
                depression_symptom_severity, anxiety_symptom_severity, notes, recommendation
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(f.entry_date)
        .bind(f.mood_rating)
        .bind(f.anxiety_level)
        .bind(f.sleep_hours)
        .bind(f.sleep_quality)
        .bind(f.stress_level)
        .bind(f.physical_activity)
        .bind(f.activity_duration)
        .bind(f.social_interaction)
        .bind(f.depression_symptoms)
        .bind(f.anxiety_symptoms)
        .bind(f.depression_symptom_severity)
        .bind(f.anxiety_symptom_severity)
        .bind(&f.notes)
        .bind(&entry.recommendation)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_day_conflict(e, f.entry_date))
    }

    async fn find_by_id(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Entry>> {
        let entry =
            sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_optional(&self.db)
                .await?;

        Ok(entry)
    }

    async fn update(&self, owner: Uuid, id: Uuid, fields: EntryFields) -> AppResult<Entry> {
        let f = &fields;
        sqlx::query_as::<_, Entry>(
            r#"
            UPDATE entries SET
                entry_date = $3,
                mood_rating = $4,
                anxiety_level = $5,
                sleep_hours = $6,
                sleep_quality = $7,
                stress_level = $8,
                physical_activity = $9,
                activity_duration = $10,
                social_interaction = $11,
                depression_symptoms = $12,
                anxiety_symptoms = $13,
                depression_symptom_severity = $14,
                anxiety_symptom_severity = $15,
                notes = $16,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(f.entry_date)
        .bind(f.mood_rating)
        .bind(f.anxiety_level)
        .bind(f.sleep_hours)
        .bind(f.sleep_quality)
        .bind(f.stress_level)
        .bind(f.physical_activity)
        .bind(f.activity_duration)
        .bind(f.social_interaction)
        .bind(f.depression_symptoms)
        .bind(f.anxiety_symptoms)
        .bind(f.depression_symptom_severity)
        .bind(f.anxiety_symptom_severity)
        .bind(&f.notes)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_day_conflict(e, f.entry_date))?
        .ok_or_else(|| AppError::NotFound(ENTRY_NOT_FOUND.into()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner: Uuid, range: DateRange) -> AppResult<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM entries
            WHERE user_id = $1
              AND ($2::timestamp IS NULL OR entry_date >= $2)
              AND ($3::timestamp IS NULL OR entry_date < $3)
            ORDER BY entry_date DESC
            "#,
        )
        .bind(owner)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::fixtures::{input_on, local};

    #[test]
    fn test_fields_normalize_date_to_midnight() {
        let fields = EntryFields::from(&input_on(local("2025-03-05 21:17")));
        assert_eq!(fields.entry_date, local("2025-03-05 00:00").local());
        assert_eq!(fields.mood_rating, 7);
    }

    #[test]
    fn test_open_range_contains_everything() {
        let range = DateRange::default();
        assert!(range.contains(local("1999-01-01 00:00").local()));
    }

    #[test]
    fn test_range_end_is_exclusive() {
        let range = DateRange {
            start: Some(local("2025-03-01 00:00").local()),
            end: Some(local("2025-03-08 00:00").local()),
        };
        assert!(range.contains(local("2025-03-01 00:00").local()));
        assert!(range.contains(local("2025-03-07 00:00").local()));
        assert!(!range.contains(local("2025-03-08 00:00").local()));
    }
}
