//! # MoodLog: Request/Response DTOs
//!
//! API contract types that are not database rows.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` / `*View` → serialized to client JSON
//! - Validation is expressed via `validator` derive macros

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::entries::DateRange;
use crate::models::entry::{ActivityCategory, Entry};
use crate::services::day_window::DayWindow;
use crate::services::formatter::{format_recommendation, FormattedRecommendation};
use crate::services::stats::StatsPeriod;

// ============================================================================
// Common
// ============================================================================

/// Standard delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// POST /api/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /api/auth/refresh
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ============================================================================
// Entries
// ============================================================================

/// GET /api/entries; both bounds are inclusive calendar days
#[derive(Debug, Default, Deserialize)]
pub struct EntryListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl EntryListQuery {
    pub fn range(&self) -> Result<DateRange, String> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err("start_date must not be after end_date".into());
            }
        }
        let end = match self.end_date {
            Some(day) => Some(
                DayWindow::for_day(day)
                    .ok_or("end_date is outside the supported range")?
                    .end,
            ),
            None => None,
        };
        Ok(DateRange {
            start: self.start_date.map(|d| d.and_time(NaiveTime::MIN)),
            end,
        })
    }
}

/// GET /api/entries/activity-categories
#[derive(Debug, Serialize)]
pub struct ActivityCategoriesResponse {
    pub categories: Vec<&'static str>,
    pub none: &'static str,
}

impl ActivityCategoriesResponse {
    pub fn new() -> Self {
        Self {
            categories: ActivityCategory::ALL.iter().map(|c| c.as_str()).collect(),
            none: ActivityCategory::None.as_str(),
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// GET /api/stats/overview
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub period: StatsPeriod,
    /// The caller's local calendar day; the server's UTC day when absent.
    pub today: Option<NaiveDate>,
}

// ============================================================================
// Recommendations
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationFilter {
    #[default]
    All,
    /// Ten newest
    Recent,
}

/// GET /api/recommendations
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub filter: RecommendationFilter,
}

/// POST /api/recommendations/format
#[derive(Debug, Deserialize, Validate)]
pub struct FormatRequest {
    #[validate(length(max = 20000, message = "Text must be under 20000 characters"))]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationView {
    pub entry_id: Uuid,
    pub date: NaiveDate,
    pub mood_rating: i32,
    pub raw: String,
    pub formatted: FormattedRecommendation,
}

impl RecommendationView {
    /// `None` when the entry has no recommendation worth showing.
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        if !entry.has_recommendation() {
            return None;
        }
        let raw = entry.recommendation.clone().unwrap_or_default();
        Some(Self {
            entry_id: entry.id,
            date: entry.day(),
            mood_rating: entry.mood_rating,
            formatted: format_recommendation(&raw),
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_range_is_inclusive_of_end_day() {
        let query = EntryListQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 7),
        };
        let range = query.range().unwrap();
        let last_day = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(range.contains(last_day));
        assert_eq!(
            range.end,
            NaiveDate::from_ymd_opt(2025, 3, 8).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_list_query_rejects_end_on_last_representable_day() {
        let query = EntryListQuery {
            start_date: None,
            end_date: Some(NaiveDate::MAX),
        };
        assert!(query.range().is_err());
        let open_start = EntryListQuery {
            start_date: Some(NaiveDate::MAX),
            end_date: None,
        };
        assert!(open_start.range().is_ok());
    }

    #[test]
    fn test_list_query_rejects_inverted_range() {
        let query = EntryListQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 9),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 7),
        };
        assert!(query.range().is_err());
    }

    #[test]
    fn test_activity_categories_response() {
        let resp = ActivityCategoriesResponse::new();
        assert_eq!(resp.categories.len(), 24);
        assert_eq!(resp.categories[0], "WALKING");
        assert_eq!(resp.none, "NONE");
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            name: "".into(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn test_stats_query_accepts_client_day() {
        let q: StatsQuery = serde_json::from_str(r#"{"period":"month","today":"2025-03-10"}"#).unwrap();
        assert_eq!(q.period, StatsPeriod::Month);
        assert_eq!(q.today, NaiveDate::from_ymd_opt(2025, 3, 10));
        let q: StatsQuery = serde_json::from_str("{}").unwrap();
        assert!(q.today.is_none());
    }

    #[test]
    fn test_recommendation_filter_defaults_to_all() {
        let q: RecommendationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.filter, RecommendationFilter::All);
        let q: RecommendationQuery = serde_json::from_str(r#"{"filter":"recent"}"#).unwrap();
        assert_eq!(q.filter, RecommendationFilter::Recent);
    }
}
