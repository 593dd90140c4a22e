use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::dto::StatsQuery;
use crate::error::{AppError, AppResult};
use crate::services::entries;
use crate::services::stats::{build_overview, StatsOverview};
use crate::AppState;

pub async fn get_overview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<StatsOverview>> {
    // Entries are stamped in the client's own calendar, so its day wins
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let range = query
        .period
        .range(today)
        .ok_or_else(|| AppError::Validation("today: is outside the supported range".into()))?;

    let list = entries::list_entries(&state.entry_store(), auth_user.id, range).await?;
    Ok(Json(build_overview(query.period, &list)))
}
