use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::{ActivityCategoriesResponse, DeleteResponse, EntryListQuery};
use crate::error::{AppError, AppResult};
use crate::models::entry::{Entry, EntryInput};
use crate::services::entries;
use crate::AppState;

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<EntryListQuery>,
) -> AppResult<Json<Vec<Entry>>> {
    let range = query.range().map_err(AppError::Validation)?;
    let list = entries::list_entries(&state.entry_store(), auth_user.id, range).await?;
    Ok(Json(list))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<Entry>> {
    let entry = entries::get_entry(&state.entry_store(), auth_user.id, entry_id).await?;
    Ok(Json(entry))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<EntryInput>,
) -> AppResult<Json<Entry>> {
    let entry =
        entries::create_entry(&state.entry_store(), &state.advice, auth_user.id, body).await?;
    Ok(Json(entry))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<EntryInput>,
) -> AppResult<Json<Entry>> {
    let entry = entries::update_entry(&state.entry_store(), auth_user.id, entry_id, body).await?;
    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    entries::delete_entry(&state.entry_store(), auth_user.id, entry_id).await?;
    Ok(Json(DeleteResponse {
        deleted: true,
        id: entry_id,
    }))
}

pub async fn activity_categories() -> Json<ActivityCategoriesResponse> {
    Json(ActivityCategoriesResponse::new())
}
