use uuid::Uuid;
use validator::Validate;

use crate::db::entries::{DateRange, EntryFields, EntryStore, NewEntry};
use crate::error::{AppError, AppResult};
use crate::models::entry::{Entry, EntryInput};
use crate::services::advice::AdviceSource;
use crate::services::day_window::DayWindow;

pub const ENTRY_NOT_FOUND: &str = "Entry not found or you don't have permission to access it";

fn not_found() -> AppError {
    AppError::NotFound(ENTRY_NOT_FOUND.into())
}

pub const DATE_OUT_OF_RANGE: &str = "date: is outside the supported range";

/// Range and cross-field checks, run before any storage access. Returns the
/// calendar-day window the entry belongs to.
pub fn validate_input(input: &EntryInput) -> AppResult<DayWindow> {
    input.validate()?;
    input.validate_activity().map_err(AppError::Validation)?;
    DayWindow::containing(input.date.local())
        .ok_or_else(|| AppError::Validation(DATE_OUT_OF_RANGE.into()))
}

/// Create the owner's entry for the submitted day. A second entry on the
/// same calendar day is refused; the caller should edit the existing one.
pub async fn create_entry<S, A>(
    store: &S,
    advice: &A,
    owner: Uuid,
    input: EntryInput,
) -> AppResult<Entry>
where
    S: EntryStore,
    A: AdviceSource,
{
    let window = validate_input(&input)?;
    if let Some(existing) = store.find_in_window(owner, window).await? {
        tracing::info!(
            user_id = %owner,
            entry_id = %existing.id,
            day = %window.day(),
            "Rejected second entry for the same day"
        );
        return Err(AppError::DuplicateEntry(window.day()));
    }

    let recommendation = advice.generate(&input).await;

    let entry = store
        .insert(NewEntry {
            id: Uuid::new_v4(),
            user_id: owner,
            fields: EntryFields::from(&input),
            recommendation: Some(recommendation),
        })
        .await?;

    tracing::info!(user_id = %owner, entry_id = %entry.id, day = %entry.day(), "Entry created");
    Ok(entry)
}

/// Replace every mutable field of an owned entry. The date is re-normalized
/// from the payload; moving onto a day that already has an entry is
/// rejected by the store's unique index.
pub async fn update_entry<S: EntryStore>(
    store: &S,
    owner: Uuid,
    id: Uuid,
    input: EntryInput,
) -> AppResult<Entry> {
    validate_input(&input)?;

    store.find_by_id(owner, id).await?.ok_or_else(not_found)?;

    let entry = store.update(owner, id, EntryFields::from(&input)).await?;
    tracing::info!(user_id = %owner, entry_id = %id, day = %entry.day(), "Entry updated");
    Ok(entry)
}

pub async fn delete_entry<S: EntryStore>(store: &S, owner: Uuid, id: Uuid) -> AppResult<()> {
    if !store.delete(owner, id).await? {
        return Err(not_found());
    }
    tracing::info!(user_id = %owner, entry_id = %id, "Entry deleted");
    Ok(())
}

pub async fn get_entry<S: EntryStore>(store: &S, owner: Uuid, id: Uuid) -> AppResult<Entry> {
    store.find_by_id(owner, id).await?.ok_or_else(not_found)
}

pub async fn list_entries<S: EntryStore>(
    store: &S,
    owner: Uuid,
    range: DateRange,
) -> AppResult<Vec<Entry>> {
    store.list_by_owner(owner, range).await
}
