use axum::{
    extract::{Query, State},
    Extension, Json,
};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db::entries::DateRange;
use crate::dto::{FormatRequest, RecommendationFilter, RecommendationQuery, RecommendationView};
use crate::error::AppResult;
use crate::models::entry::Entry;
use crate::services::entries;
use crate::services::formatter::{format_recommendation, FormattedRecommendation};
use crate::AppState;

const RECENT_LIMIT: usize = 10;

pub async fn list_recommendations(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendationView>>> {
    let all = entries::list_entries(&state.entry_store(), auth_user.id, DateRange::default()).await?;
    Ok(Json(collect_recommendations(&all, query.filter)))
}

/// Preview how a piece of text will be laid out.
pub async fn format_text(Json(body): Json<FormatRequest>) -> AppResult<Json<FormattedRecommendation>> {
    body.validate()?;
    Ok(Json(format_recommendation(&body.text)))
}

/// Entries arrive newest first; blank recommendations are skipped.
fn collect_recommendations(entries: &[Entry], filter: RecommendationFilter) -> Vec<RecommendationView> {
    let views = entries.iter().filter_map(RecommendationView::from_entry);
    match filter {
        RecommendationFilter::All => views.collect(),
        RecommendationFilter::Recent => views.take(RECENT_LIMIT).collect(),
    }
}
