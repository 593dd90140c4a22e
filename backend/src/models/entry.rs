use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub recommendation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    pub fn day(&self) -> NaiveDate {
        self.entry_date.date()
    }

    /// True when a non-blank recommendation is attached.
    pub fn has_recommendation(&self) -> bool {
        self.recommendation
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "activity_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityCategory {
    Walking,
    Running,
    Cycling,
    Swimming,
    Hiking,
    GymWorkout,
    Yoga,
    Pilates,
    Dancing,
    MartialArts,
    TeamSports,
    RacquetSports,
    WaterSports,
    WinterSports,
    HomeWorkout,
    Calisthenics,
    Weightlifting,
    Crossfit,
    Boxing,
    Climbing,
    Skateboarding,
    Rowing,
    Other,
    None,
}

impl Default for ActivityCategory {
    fn default() -> Self {
        Self::None
    }
}

impl ActivityCategory {
    /// Every category in display order; `None` is last.
    pub const ALL: [ActivityCategory; 24] = [
        Self::Walking,
        Self::Running,
        Self::Cycling,
        Self::Swimming,
        Self::Hiking,
        Self::GymWorkout,
        Self::Yoga,
        Self::Pilates,
        Self::Dancing,
        Self::MartialArts,
        Self::TeamSports,
        Self::RacquetSports,
        Self::WaterSports,
        Self::WinterSports,
        Self::HomeWorkout,
        Self::Calisthenics,
        Self::Weightlifting,
        Self::Crossfit,
        Self::Boxing,
        Self::Climbing,
        Self::Skateboarding,
        Self::Rowing,
        Self::Other,
        Self::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "WALKING",
            Self::Running => "RUNNING",
            Self::Cycling => "CYCLING",
            Self::Swimming => "SWIMMING",
            Self::Hiking => "HIKING",
            Self::GymWorkout => "GYM_WORKOUT",
            Self::Yoga => "YOGA",
            Self::Pilates => "PILATES",
            Self::Dancing => "DANCING",
            Self::MartialArts => "MARTIAL_ARTS",
            Self::TeamSports => "TEAM_SPORTS",
            Self::RacquetSports => "RACQUET_SPORTS",
            Self::WaterSports => "WATER_SPORTS",
            Self::WinterSports => "WINTER_SPORTS",
            Self::HomeWorkout => "HOME_WORKOUT",
            Self::Calisthenics => "CALISTHENICS",
            Self::Weightlifting => "WEIGHTLIFTING",
            Self::Crossfit => "CROSSFIT",
            Self::Boxing => "BOXING",
            Self::Climbing => "CLIMBING",
            Self::Skateboarding => "SKATEBOARDING",
            Self::Rowing => "ROWING",
            Self::Other => "OTHER",
            Self::None => "NONE",
        }
    }
}

/// Date as submitted by a client. A zoned timestamp is read in its own
/// offset, so "23:30-05:00" still belongs to the caller's calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EntryDate {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
    Day(NaiveDate),
}

impl EntryDate {
    pub fn local(&self) -> NaiveDateTime {
        match self {
            EntryDate::Zoned(ts) => ts.naive_local(),
            EntryDate::Local(ts) => *ts,
            EntryDate::Day(day) => day.and_time(chrono::NaiveTime::MIN),
        }
    }
}

/// Body of POST /api/entries and PUT /api/entries/:id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EntryInput {
    pub date: EntryDate,

    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub mood_rating: i32,

    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub anxiety_level: i32,

    #[validate(range(min = 0.0, max = 24.0, message = "must be between 0 and 24"))]
    pub sleep_hours: f64,

    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub sleep_quality: i32,

    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub stress_level: i32,

    #[serde(default)]
    pub physical_activity: ActivityCategory,

    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub activity_duration: i32,

    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub social_interaction: i32,

    #[serde(default)]
    pub depression_symptoms: bool,

    #[serde(default)]
    pub anxiety_symptoms: bool,

    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    pub depression_symptom_severity: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    pub anxiety_symptom_severity: i32,

    #[validate(length(max = 5000, message = "must be under 5000 characters"))]
    pub notes: Option<String>,
}

impl EntryInput {
    /// A resting day carries no activity time.
    pub fn validate_activity(&self) -> Result<(), String> {
        if self.physical_activity == ActivityCategory::None && self.activity_duration != 0 {
            return Err("activity_duration must be 0 when physical_activity is NONE".into());
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_entry_date_accepts_rfc3339_in_its_own_offset() {
        let date: EntryDate = serde_json::from_str(r#""2025-03-05T23:30:00-05:00""#).unwrap();
        assert!(matches!(date, EntryDate::Zoned(_)));
        assert_eq!(date.local().date(), NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
    }

    #[test]
    fn test_entry_date_accepts_naive_timestamp() {
        let date: EntryDate = serde_json::from_str(r#""2025-03-05T08:15:00""#).unwrap();
        assert!(matches!(date, EntryDate::Local(_)));
    }

    #[test]
    fn test_entry_date_accepts_bare_day() {
        let date: EntryDate = serde_json::from_str(r#""2025-03-05""#).unwrap();
        assert_eq!(
            date.local(),
            NaiveDate::from_ymd_opt(2025, 3, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_unknown_activity_category_rejected() {
        let result = serde_json::from_str::<ActivityCategory>(r#""PARKOUR""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_activity_category_labels_match_serde() {
        for category in ActivityCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        assert_eq!(ActivityCategory::ALL.last(), Some(&ActivityCategory::None));
    }

    #[test]
    fn test_valid_input_passes() {
        let input = input_on(local("2025-03-05 10:00"));
        assert!(input.validate().is_ok());
        assert!(input.validate_activity().is_ok());
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        let mut input = input_on(local("2025-03-05 10:00"));
        input.mood_rating = 11;
        input.sleep_hours = 25.0;
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("mood_rating"));
        assert!(fields.contains_key("sleep_hours"));
    }

    #[test]
    fn test_severity_allows_zero() {
        let mut input = input_on(local("2025-03-05 10:00"));
        input.anxiety_symptom_severity = 0;
        input.depression_symptom_severity = 10;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_none_activity_requires_zero_duration() {
        let mut input = input_on(local("2025-03-05 10:00"));
        input.physical_activity = ActivityCategory::None;
        assert!(input.validate_activity().is_err());
        input.activity_duration = 0;
        assert!(input.validate_activity().is_ok());
    }

    #[test]
    fn test_input_deserializes_with_defaults() {
        let json = r#"{
            "date": "2025-03-05",
            "mood_rating": 5,
            "anxiety_level": 5,
            "sleep_hours": 8,
            "sleep_quality": 5,
            "stress_level": 5,
            "social_interaction": 5
        }"#;
        let input: EntryInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.physical_activity, ActivityCategory::None);
        assert_eq!(input.activity_duration, 0);
        assert!(!input.depression_symptoms);
        assert!(input.notes.is_none());
    }
}
